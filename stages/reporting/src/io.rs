use csv::{ReaderBuilder, Trim, Writer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ReportError;
use crate::stats::StatsReport;

/// Metrics file looked up in every experiment run directory.
pub const DEFAULT_METRICS_FILENAME: &str = "inference_metrics.csv";

/// Metric names and values of every run found under an experiments directory.
///
/// The three vectors are index-aligned: entry `i` of each describes one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsCollection {
    pub runs: Vec<PathBuf>,
    pub metric_keys: Vec<Vec<String>>,
    pub metric_values: Vec<Vec<f64>>,
}

impl MetricsCollection {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Loads the metrics file of every run directory directly below
/// `experiments_path`.
///
/// Run directories are visited in path order. Directories without the metrics
/// file are skipped. Each file holds a header row of metric names followed by
/// a row of values; only the first value row is read.
pub fn load_metrics(
    experiments_path: impl AsRef<Path>,
    filename: Option<&str>,
) -> Result<MetricsCollection, ReportError> {
    let filename = filename.unwrap_or(DEFAULT_METRICS_FILENAME);

    let mut run_dirs = Vec::new();
    for entry in fs::read_dir(experiments_path.as_ref())? {
        let path = entry?.path();
        if path.is_dir() {
            run_dirs.push(path);
        }
    }
    run_dirs.sort();

    let mut collection = MetricsCollection::default();
    for dir in run_dirs {
        let metrics_path = dir.join(filename);
        if !metrics_path.is_file() {
            log::debug!("skipping {}: no {}", dir.display(), filename);
            continue;
        }
        let (keys, values) = read_metrics_file(&metrics_path)?;
        collection.runs.push(dir);
        collection.metric_keys.push(keys);
        collection.metric_values.push(values);
    }
    Ok(collection)
}

fn read_metrics_file(path: &Path) -> Result<(Vec<String>, Vec<f64>), ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let keys: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let record = reader
        .records()
        .next()
        .ok_or_else(|| ReportError::MissingValues(path.to_path_buf()))??;

    let values = keys
        .iter()
        .zip(record.iter())
        .map(|(key, raw)| {
            raw.parse::<f64>().map_err(|_| ReportError::InvalidValue {
                path: path.to_path_buf(),
                metric: key.clone(),
                value: raw.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((keys, values))
}

/// Writes `report` as CSV to `dest`, or to `dest/filename` when a file name is
/// given. Returns the path that was written.
pub fn save_metrics(
    dest: impl AsRef<Path>,
    report: &StatsReport,
    filename: Option<&str>,
) -> Result<PathBuf, ReportError> {
    let path = match filename {
        Some(name) => dest.as_ref().join(name),
        None => dest.as_ref().to_path_buf(),
    };

    let mut writer = Writer::from_path(&path)?;
    writer.write_record(report.header())?;
    for row in report.rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_run(root: &Path, run: &str, contents: &str) {
        let dir = root.join(run);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFAULT_METRICS_FILENAME), contents).unwrap();
    }

    #[test]
    fn test_load_metrics_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_1", "acc,f1\n0.9,0.7\n");
        write_run(tmp.path(), "run_0", "acc, f1\n0.8 ,0.6\n");

        let metrics = load_metrics(tmp.path(), None).unwrap();

        assert_eq!(metrics.len(), 2);
        assert!(metrics.runs[0].ends_with("run_0"));
        assert_eq!(metrics.metric_keys[0], vec!["acc", "f1"]);
        assert_eq!(metrics.metric_values[0], vec![0.8, 0.6]);
        assert_eq!(metrics.metric_values[1], vec![0.9, 0.7]);
    }

    #[test]
    fn test_load_metrics_skips_dirs_without_file() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc\n0.5\n");
        fs::create_dir_all(tmp.path().join("logs")).unwrap();
        fs::write(tmp.path().join("notes.txt"), "not a run").unwrap();

        let metrics = load_metrics(tmp.path(), None).unwrap();
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_load_metrics_custom_filename() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("run_0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("train_metrics.csv"), "loss\n0.25\n").unwrap();

        assert!(load_metrics(tmp.path(), None).unwrap().is_empty());
        let metrics = load_metrics(tmp.path(), Some("train_metrics.csv")).unwrap();
        assert_eq!(metrics.metric_values, vec![vec![0.25]]);
    }

    #[test]
    fn test_missing_value_row() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc,f1\n");
        let result = load_metrics(tmp.path(), None);
        assert!(matches!(result, Err(ReportError::MissingValues(_))));
    }

    #[test]
    fn test_unparsable_value() {
        let tmp = TempDir::new().unwrap();
        write_run(tmp.path(), "run_0", "acc,f1\n0.5,high\n");
        match load_metrics(tmp.path(), None) {
            Err(ReportError::InvalidValue { metric, value, .. }) => {
                assert_eq!(metric, "f1");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_experiments_dir() {
        let tmp = TempDir::new().unwrap();
        let result = load_metrics(tmp.path().join("absent"), None);
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
