//! Job and Outcome types.

use crate::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One file's compression task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: Preset,
    pub overwrite: bool,
}

/// Terminal classification of a Job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Compressed output was smaller and was promoted
    Compressed,
    /// Compression did not help, the original was copied instead
    CopiedOriginal,
    /// Output already existed and overwrite was disabled
    Skipped,
    Failed,
}

impl OutcomeKind {
    /// Tag used at the start of log lines
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Compressed => "[OK]",
            Self::CopiedOriginal => "[COPY]",
            Self::Skipped => "[SKIP]",
            Self::Failed => "[FAIL]",
        }
    }
}

/// Result of one Job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: OutcomeKind,
    /// Input size in bytes (0 for skipped jobs and unreadable inputs)
    pub input_size: u64,
    /// Ghostscript produced a usable output for this job
    pub tool_output: bool,
    /// Size of the final output, when one was produced
    pub output_size: Option<u64>,
    /// Truncated diagnostic for failed jobs
    pub diagnostic: Option<String>,
}

impl Outcome {
    pub fn skipped(job: &Job) -> Self {
        Self {
            input: job.input.clone(),
            output: job.output.clone(),
            kind: OutcomeKind::Skipped,
            input_size: 0,
            tool_output: false,
            output_size: None,
            diagnostic: None,
        }
    }

    /// `tool_output` is true when only promotion failed
    pub fn failed(
        input: &Path,
        output: &Path,
        input_size: u64,
        tool_output: bool,
        diagnostic: String,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            kind: OutcomeKind::Failed,
            input_size,
            tool_output,
            output_size: None,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn written(job: &Job, kind: OutcomeKind, input_size: u64, output_size: u64) -> Self {
        Self {
            input: job.input.clone(),
            output: job.output.clone(),
            kind,
            input_size,
            tool_output: true,
            output_size: Some(output_size),
            diagnostic: None,
        }
    }
}
