// Persistence for Monte-Carlo scalar samples

pub mod sample_store;

// Re-export commonly used types
pub use sample_store::{SampleFile, SampleKind, SampleStore};
