//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di compressione.
//!
//! ## Componenti principali:
//! - `RunSummary`: aggregatore puramente additivo degli `Outcome`
//! - `ProgressManager`: progress bar `indicatif` usata dalla CLI
//!
//! ## Statistiche tracciate:
//! - **succeeded**: file compressi o copiati (fallback)
//! - **skipped**: output già esistente e overwrite disabilitato
//! - **failed**: errori di Ghostscript o del filesystem
//! - **total_in_bytes**: byte di input dei job per cui Ghostscript ha prodotto un output
//! - **total_out_bytes**: byte di ogni output finale prodotto
//!
//! ## Risparmio:
//! `saved = max(total_in - total_out, 0)`, `saved_ratio = saved / total_in`
//! (non applicabile se `total_in == 0`).
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:02:15] [========================>---------------] 150/250 (60%) [OK] report.pdf
//! ```

use crate::batch::{Outcome, OutcomeKind};
use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Manages the progress bar shown by the command line surface
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Move the bar to an absolute position
    pub fn set_position(&self, completed: u64) {
        self.bar.set_position(completed);
    }

    /// Print a line above the bar
    pub fn println(&self, line: &str) {
        self.bar.println(line);
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Number of enumerated files
    pub total: usize,
    pub total_in_bytes: u64,
    pub total_out_bytes: u64,
    /// The run ended because a stop was requested
    pub stopped: bool,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Fold one outcome into the counters
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome.kind {
            OutcomeKind::Compressed | OutcomeKind::CopiedOriginal => self.succeeded += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Failed => self.failed += 1,
        }

        if outcome.tool_output {
            self.total_in_bytes += outcome.input_size;
        }
        if let Some(output_size) = outcome.output_size {
            self.total_out_bytes += output_size;
        }
    }

    /// Files that received an outcome
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// Files left untouched because of a stop request
    pub fn unprocessed(&self) -> usize {
        self.total.saturating_sub(self.processed())
    }

    pub fn saved_bytes(&self) -> u64 {
        self.total_in_bytes.saturating_sub(self.total_out_bytes)
    }

    /// None when nothing was attempted
    pub fn saved_ratio(&self) -> Option<f64> {
        if self.total_in_bytes > 0 {
            Some(self.saved_bytes() as f64 / self.total_in_bytes as f64)
        } else {
            None
        }
    }

    pub fn format_counts(&self) -> String {
        format!(
            "DONE. OK={}  SKIP={}  FAIL={}  TOT={}",
            self.succeeded, self.skipped, self.failed, self.total
        )
    }

    pub fn format_savings(&self) -> String {
        match self.saved_ratio() {
            Some(ratio) => format!(
                "Space saved: {} ({:.2}%)",
                FileManager::format_size(self.saved_bytes()),
                ratio * 100.0
            ),
            None => "Space saved: n/a".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcome(kind: OutcomeKind, input_size: u64, tool_output: bool, output_size: Option<u64>) -> Outcome {
        Outcome {
            input: PathBuf::from("in.pdf"),
            output: PathBuf::from("out.pdf"),
            kind,
            input_size,
            tool_output,
            output_size,
            diagnostic: None,
        }
    }

    #[test]
    fn test_record_each_kind() {
        let mut summary = RunSummary::new(6);
        summary.record(&outcome(OutcomeKind::Compressed, 5_000_000, true, Some(2_000_000)));
        summary.record(&outcome(OutcomeKind::CopiedOriginal, 1_000_000, true, Some(1_000_000)));
        summary.record(&outcome(OutcomeKind::Skipped, 0, false, None));
        summary.record(&outcome(OutcomeKind::Failed, 300, false, None));
        summary.record(&outcome(OutcomeKind::Failed, 40, true, None));

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.processed(), 5);
        assert_eq!(summary.unprocessed(), 1);
        assert_eq!(summary.total_in_bytes, 6_000_040);
        assert_eq!(summary.total_out_bytes, 3_000_000);
    }

    #[test]
    fn test_tool_failures_do_not_count_as_saved() {
        let mut summary = RunSummary::new(1);
        summary.record(&outcome(OutcomeKind::Failed, 1_000_000, false, None));

        assert_eq!(summary.total_in_bytes, 0);
        assert_eq!(summary.saved_bytes(), 0);
        assert_eq!(summary.format_counts(), "DONE. OK=0  SKIP=0  FAIL=1  TOT=1");
        assert_eq!(summary.format_savings(), "Space saved: n/a");
    }

    #[test]
    fn test_skipped_input_not_counted() {
        let mut summary = RunSummary::new(1);
        summary.record(&outcome(OutcomeKind::Skipped, 42, false, None));
        assert_eq!(summary.total_in_bytes, 0);
        assert_eq!(summary.saved_ratio(), None);
        assert_eq!(summary.format_savings(), "Space saved: n/a");
    }

    #[test]
    fn test_savings() {
        let summary = RunSummary {
            succeeded: 2,
            total: 2,
            total_in_bytes: 6_000_000,
            total_out_bytes: 3_000_000,
            ..RunSummary::default()
        };
        assert_eq!(summary.saved_bytes(), 3_000_000);
        assert_eq!(summary.saved_ratio(), Some(0.5));
        assert_eq!(summary.format_savings(), "Space saved: 3.00 MB (50.00%)");
        assert_eq!(summary.format_counts(), "DONE. OK=2  SKIP=0  FAIL=0  TOT=2");
    }

    #[test]
    fn test_saved_never_negative() {
        let summary = RunSummary {
            total_in_bytes: 100,
            total_out_bytes: 150,
            ..RunSummary::default()
        };
        assert_eq!(summary.saved_bytes(), 0);
        assert_eq!(summary.saved_ratio(), Some(0.0));
    }
}
