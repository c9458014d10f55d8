// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use analysis::{
    AlignmentConfig, Baseline, MonteCarloConfig, OnsetConfig, WelchResult, average_deviation_curves,
    compute_baseline, compute_deviation, control_sample, detect_onsets, experimental_sample,
    threshold_curve, welch_t_test,
};
pub use data::{SampleFile, SampleKind, SampleStore};
pub use domain::{CalendarDay, SiteInfo, SiteResolver, WinterWindow};
pub use error::{AnalysisError, Result};
pub use models::{
    AverageCurve, DeviationTable, ExcessPoint, ExcessSeries, OnsetSet, SignalTable, Threshold,
    onset_day_histogram,
};
