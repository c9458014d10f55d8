// Data models for the analysis pipeline
// These modules contain pure data containers independent of the algorithms

pub mod curve;
pub mod onset;
pub mod signal;

// Re-export key types for convenience
pub use curve::{AverageCurve, onset_day_histogram};
pub use onset::{OnsetSet, Threshold};
pub use signal::{DeviationTable, ExcessPoint, ExcessSeries, SignalTable};
