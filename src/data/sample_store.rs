use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{SAMPLE_STORE_VERSION, sample_store_filename};
use crate::models::Threshold;

/// Which of the two Monte-Carlo distributions a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Control,
    Experimental,
}

impl SampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleKind::Control => "control",
            SampleKind::Experimental => "experimental",
        }
    }
}

/// Serialized sample collection for one (dataset, threshold, kind) key.
///
/// `completed_iterations` is a cursor of outer iterations already attempted,
/// persisted alongside the scalars so an interrupted run resumes exactly
/// where it stopped instead of double-counting merged batches.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SampleFile {
    pub version: u32,
    pub completed_iterations: usize,
    pub samples: Vec<f64>,
}

impl SampleFile {
    pub fn empty() -> Self {
        Self {
            version: SAMPLE_STORE_VERSION,
            completed_iterations: 0,
            samples: Vec::new(),
        }
    }
}

/// Append-mergeable sink for Monte-Carlo scalars, keyed by
/// (dataset, threshold, sample kind).
///
/// Checkpoints are read-merge-write: load whatever the file already holds,
/// append the new scalars, advance the cursor, and rewrite through a temp
/// file plus rename so an interruption never tears the collection. No
/// deduplication happens; the cursor makes resumption idempotent.
#[derive(Debug, Clone)]
pub struct SampleStore {
    path: PathBuf,
}

impl SampleStore {
    pub fn new(dir: impl AsRef<Path>, dataset: &str, threshold: Threshold, kind: SampleKind) -> Self {
        let filename = sample_store_filename(dataset, threshold.value(), kind.as_str());
        Self {
            path: dir.as_ref().join(filename),
        }
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted collection; a store that does not exist yet reads
    /// as empty.
    pub fn load(&self) -> Result<SampleFile> {
        if !self.path.exists() {
            return Ok(SampleFile::empty());
        }
        let file = File::open(&self.path)
            .context(format!("Failed to open sample file: {:?}", self.path))?;
        let reader = BufReader::new(file);
        let samples: SampleFile = serde_json::from_reader(reader)
            .context(format!("Failed to deserialize samples: {:?}", self.path))?;
        Ok(samples)
    }

    /// Read-merge-write checkpoint: append `new_samples` to the persisted
    /// collection and advance the iteration cursor by `iterations_done`.
    /// Returns the merged state.
    pub fn append(&self, new_samples: &[f64], iterations_done: usize) -> Result<SampleFile> {
        let mut merged = self.load()?;
        merged.samples.extend_from_slice(new_samples);
        merged.completed_iterations += iterations_done;
        self.write_atomic(&merged)?;
        Ok(merged)
    }

    fn write_atomic(&self, contents: &SampleFile) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)
                .context(format!("Failed to create file: {}", tmp_path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, contents)
                .context(format!("Failed to serialize samples to: {}", tmp_path.display()))?;
        }
        std::fs::rename(&tmp_path, &self.path).context(format!(
            "Failed to move {} into place",
            tmp_path.display()
        ))?;
        Ok(())
    }
}
