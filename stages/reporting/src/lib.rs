//! Aggregation of per-run experiment metrics into a statistics report.

use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

mod io;
mod stats;

pub use io::{DEFAULT_METRICS_FILENAME, MetricsCollection, load_metrics, save_metrics};
pub use stats::{MetricStats, STAT_NAMES, STATS_COLUMN, StatsReport};

/// File name of the report when the destination is a directory.
pub const REPORT_FILENAME: &str = "report.csv";

/// Errors that can occur while collecting or writing a report.
#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// A metrics file has a header but no value row.
    MissingValues(PathBuf),
    /// A metric value is not a number.
    InvalidValue {
        path: PathBuf,
        metric: String,
        value: String,
    },
    /// No run directory under the experiments path holds a metrics file.
    NoExperimentRuns(PathBuf),
    /// Runs disagree on which metrics they report.
    InconsistentMetricNames { distinct_sets: usize },
    /// A single run lists the same metric twice.
    DuplicateMetricName { run: PathBuf, metric: String },
    /// Statistics are undefined for the metric (no values, or a NaN value).
    UndefinedStatistic(String),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "I/O error: {}", e),
            ReportError::Csv(e) => write!(f, "CSV error: {}", e),
            ReportError::MissingValues(path) => {
                write!(f, "metrics file {} has no value row", path.display())
            }
            ReportError::InvalidValue {
                path,
                metric,
                value,
            } => write!(
                f,
                "value {:?} of metric {} in {} is not a number",
                value,
                metric,
                path.display()
            ),
            ReportError::NoExperimentRuns(path) => {
                write!(f, "no experiment runs found under {}", path.display())
            }
            ReportError::InconsistentMetricNames { distinct_sets } => write!(
                f,
                "metric names must be consistent across all experiment runs ({} distinct sets found)",
                distinct_sets
            ),
            ReportError::DuplicateMetricName { run, metric } => write!(
                f,
                "metric {} appears more than once in run {}",
                metric,
                run.display()
            ),
            ReportError::UndefinedStatistic(metric) => {
                write!(f, "statistics of metric {} are undefined", metric)
            }
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReportError::Io(e) => Some(e),
            ReportError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Io(e)
    }
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        ReportError::Csv(e)
    }
}

/// Builds per-metric statistics out of the loaded runs.
///
/// Every run must report the same set of metric names; column order may
/// differ between runs, values are matched by name. Report columns follow
/// the first run's order.
pub fn build_report(metrics: &MetricsCollection) -> Result<StatsReport, ReportError> {
    let mut key_sets = HashSet::new();
    for (run, keys) in metrics.runs.iter().zip(&metrics.metric_keys) {
        let set: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
        if set.len() != keys.len() {
            let mut seen = HashSet::new();
            let metric = keys
                .iter()
                .find(|k| !seen.insert(k.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(ReportError::DuplicateMetricName {
                run: run.clone(),
                metric,
            });
        }
        key_sets.insert(set);
    }
    if key_sets.len() != 1 {
        return Err(ReportError::InconsistentMetricNames {
            distinct_sets: key_sets.len(),
        });
    }

    let names = &metrics.metric_keys[0];
    let mut artifacts: Vec<Vec<f64>> = vec![Vec::with_capacity(metrics.len()); names.len()];
    for (keys, values) in metrics.metric_keys.iter().zip(&metrics.metric_values) {
        for (key, value) in keys.iter().zip(values) {
            if let Some(column) = names.iter().position(|name| name == key) {
                artifacts[column].push(*value);
            }
        }
    }

    let metrics = names
        .iter()
        .zip(&artifacts)
        .map(|(name, values)| MetricStats::from_values(name, values))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StatsReport { metrics })
}

/// Collects the statistics report of the runs under `experiments_path`.
///
/// # Arguments
///
/// * `experiments_path`: Directory holding one subdirectory per run.
/// * `dest_path`: Either the full path of the report file (anything with an
///   extension) or a directory, created if missing, that receives
///   `report.csv`.
/// * `filename`: Name of the metrics file inside each run directory,
///   `inference_metrics.csv` when `None`.
///
/// # Returns
///
/// The path of the written report.
///
/// # Errors
///
/// Fails without writing anything when no run is found or the runs disagree
/// on their metric names; I/O and CSV errors are propagated as they occur.
pub fn collect_artifacts_report(
    experiments_path: impl AsRef<Path>,
    dest_path: impl AsRef<Path>,
    filename: Option<&str>,
) -> Result<PathBuf, ReportError> {
    let experiments_path = experiments_path.as_ref();
    let dest_path = dest_path.as_ref();

    let metrics = load_metrics(experiments_path, filename)?;
    if metrics.is_empty() {
        return Err(ReportError::NoExperimentRuns(experiments_path.to_path_buf()));
    }
    let report = build_report(&metrics)?;

    let written = if dest_path.extension().is_some() {
        save_metrics(dest_path, &report, None)?
    } else {
        fs::create_dir_all(dest_path)?;
        save_metrics(dest_path, &report, Some(REPORT_FILENAME))?
    };
    log::info!(
        "wrote report of {} metrics over {} runs to {}",
        report.metrics.len(),
        metrics.len(),
        written.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::TempDir;

    fn write_run(root: &Path, run: &str, contents: &str) {
        let dir = root.join(run);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFAULT_METRICS_FILENAME), contents).unwrap();
    }

    fn three_runs() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc,f1\n0.8,0.5\n");
        write_run(tmp.path(), "run_1", "acc,f1\n0.9,0.5\n");
        write_run(tmp.path(), "run_2", "acc,f1\n1.0,0.5\n");
        tmp
    }

    fn read_report(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_report_statistics() {
        let tmp = three_runs();
        let metrics = load_metrics(tmp.path(), None).unwrap();
        let report = build_report(&metrics).unwrap();

        let acc = report.get("acc").unwrap();
        assert_abs_diff_eq!(acc.mean, 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(acc.std, 0.0816, epsilon = 1e-4);
        assert_abs_diff_eq!(acc.min, 0.8);
        assert_abs_diff_eq!(acc.max, 1.0);
        assert_eq!(report.get("f1").unwrap().std, 0.0);
    }

    #[test]
    fn test_inconsistent_metric_names() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc,f1\n0.8,0.5\n");
        write_run(tmp.path(), "run_1", "acc\n0.9\n");
        let dest = tmp.path().join("out");

        let result = collect_artifacts_report(tmp.path(), &dest, None);

        assert!(matches!(
            result,
            Err(ReportError::InconsistentMetricNames { distinct_sets: 2 })
        ));
        assert!(!dest.exists());
    }

    #[test]
    fn test_column_order_may_differ_between_runs() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc,f1\n0.8,0.2\n");
        write_run(tmp.path(), "run_1", "f1,acc\n0.4,1.0\n");

        let report = build_report(&load_metrics(tmp.path(), None).unwrap()).unwrap();

        assert_eq!(report.header(), vec!["Stats", "acc", "f1"]);
        assert_abs_diff_eq!(report.get("acc").unwrap().mean, 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(report.get("f1").unwrap().mean, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicate_metric_name() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc,acc\n0.8,0.9\n");
        let result = build_report(&load_metrics(tmp.path(), None).unwrap());
        match result {
            Err(ReportError::DuplicateMetricName { metric, .. }) => assert_eq!(metric, "acc"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_writes_report_into_directory() {
        let tmp = three_runs();
        let dest = tmp.path().join("reports").join("summary");

        let written = collect_artifacts_report(tmp.path(), &dest, None).unwrap();

        assert_eq!(written, dest.join(REPORT_FILENAME));
        let rows = read_report(&written);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec!["Stats", "acc", "f1"]);
        let first_column: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(first_column, vec!["Stats", "mean", "std", "min", "max"]);
        assert_eq!(rows[3][1], "0.8");
        assert_eq!(rows[4][1], "1");
    }

    #[test]
    fn test_writes_report_to_exact_file() {
        let tmp = three_runs();
        let dest = tmp.path().join("final.csv");

        let written = collect_artifacts_report(tmp.path(), &dest, None).unwrap();

        assert_eq!(written, dest);
        assert!(dest.is_file());
        assert_eq!(read_report(&dest)[0], vec!["Stats", "acc", "f1"]);
    }

    #[test]
    fn test_no_runs() {
        let tmp = TempDir::new().unwrap();
        let result = collect_artifacts_report(tmp.path(), tmp.path().join("out"), None);
        assert!(matches!(result, Err(ReportError::NoExperimentRuns(_))));
    }

    #[test]
    fn test_error_display() {
        let err = ReportError::InconsistentMetricNames { distinct_sets: 2 };
        assert!(err.to_string().contains("consistent across all experiment runs"));
    }
}
