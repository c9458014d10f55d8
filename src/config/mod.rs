//! Configuration module for the fluonset analysis core.

pub mod persistence;
pub mod study;

// Re-export commonly used items
pub use persistence::{SAMPLE_STORE_DIR, SAMPLE_STORE_VERSION, sample_store_filename};
pub use study::{
    CHECKPOINT_INTERVAL, CONTROL_SAMPLE_SIZE, DAY_SHIFT_MAX, DAY_SHIFT_MIN, INTERVAL_LENGTH_DAYS,
    default_day_shift_range,
};
