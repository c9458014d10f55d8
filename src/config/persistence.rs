//! File persistence and serialization configuration

/// Directory path for storing Monte-Carlo sample files
pub const SAMPLE_STORE_DIR: &str = "samples";

/// Current version of the sample file serialization format
pub const SAMPLE_STORE_VERSION: u32 = 1;

/// Generate a per-(dataset, threshold, kind) sample filename
/// Example: "usa_t0.015_control_v1.json"
pub fn sample_store_filename(dataset: &str, threshold: f64, kind: &str) -> String {
    format!(
        "{}_t{}_{}_v{}.json",
        dataset, threshold, kind, SAMPLE_STORE_VERSION
    )
}
