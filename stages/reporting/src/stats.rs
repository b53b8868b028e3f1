use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::ReportError;

/// Label of the first report column.
pub const STATS_COLUMN: &str = "Stats";

/// Row labels of the report, in output order.
pub const STAT_NAMES: [&str; 4] = ["mean", "std", "min", "max"];

/// Aggregated statistics of one metric across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricStats {
    pub name: String,
    pub mean: f64,
    /// Population standard deviation (no degrees-of-freedom correction).
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricStats {
    /// Summarizes `values`, which must be non-empty and NaN-free.
    pub fn from_values(name: &str, values: &[f64]) -> Result<Self, ReportError> {
        let values = Array1::from(values.to_vec());
        let undefined = || ReportError::UndefinedStatistic(name.to_string());

        let mean = values.mean().ok_or_else(undefined)?;
        let min = *values.min().map_err(|_| undefined())?;
        let max = *values.max().map_err(|_| undefined())?;
        Ok(Self {
            name: name.to_string(),
            mean,
            std: values.std(0.0),
            min,
            max,
        })
    }

    fn stat(&self, index: usize) -> f64 {
        [self.mean, self.std, self.min, self.max][index]
    }
}

/// Statistics of every metric, in report column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    pub metrics: Vec<MetricStats>,
}

impl StatsReport {
    pub fn get(&self, name: &str) -> Option<&MetricStats> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// `Stats` followed by the metric names.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(STATS_COLUMN.to_string())
            .chain(self.metrics.iter().map(|m| m.name.clone()))
            .collect()
    }

    /// One row per statistic, each starting with the statistic's name.
    pub fn rows(&self) -> Vec<Vec<String>> {
        STAT_NAMES
            .iter()
            .enumerate()
            .map(|(i, stat)| {
                std::iter::once(stat.to_string())
                    .chain(self.metrics.iter().map(|m| m.stat(i).to_string()))
                    .collect()
            })
            .collect()
    }
}
