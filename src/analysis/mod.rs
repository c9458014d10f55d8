// Analysis algorithms: baseline computation, onset detection,
// event alignment, and Monte-Carlo hypothesis testing

pub mod alignment;
pub mod baseline;
pub mod monte_carlo;
pub mod onset_detection;
pub mod welch;

// Re-export commonly used types
pub use alignment::{AlignmentConfig, average_deviation_curves, threshold_curve};
pub use baseline::{Baseline, compute_baseline, compute_deviation};
pub use monte_carlo::{MonteCarloConfig, control_sample, experimental_sample};
pub use onset_detection::{OnsetConfig, detect_onsets};
pub use welch::{WelchResult, welch_t_test};
