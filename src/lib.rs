// Re-export the stage crates under one roof
pub use hsi_preprocessing::{
    PreprocessError, SetSize, SplitConfig, SplitError, SplitIndices, SplitSets,
    remove_nan_samples, reshape_cube_to_1d_samples, split_indices, train_val_test_split,
    train_val_test_split_with_config, train_val_test_split_with_rng,
};
pub use hsi_reporting::{
    DEFAULT_METRICS_FILENAME, MetricStats, MetricsCollection, REPORT_FILENAME, ReportError,
    StatsReport, build_report, collect_artifacts_report, load_metrics, save_metrics,
};
pub use prep_helpers::{ClassIndices, Float, label_indices_per_class, shuffle_arrays_together};
