//! Batch drivers for the two run modes.

mod outline_job;
mod ranking_job;

pub use outline_job::{extract_document_outline, process_outline_batch, OutlineBatchSummary};
pub use ranking_job::process_ranking_batch;

use std::path::PathBuf;

/// Source and destination directories for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory holding the input PDFs (and `input.json` in ranking mode)
    pub input_dir: PathBuf,
    /// Directory the JSON results are written to
    pub output_dir: PathBuf,
}

impl BatchConfig {
    /// Create a batch configuration.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}
