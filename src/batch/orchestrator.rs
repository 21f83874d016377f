//! # Batch Orchestrator
//!
//! Orchestratore sequenziale: un file alla volta, nell'ordine di enumerazione.
//!
//! ## Ciclo di vita di un Job:
//! ```text
//! stop? ──► break
//! output esiste && !overwrite ──► [SKIP]
//! rimozione temp stantio ──► Ghostscript(input, temp)
//!   ├─ spawn fallito / rc≠0 / temp mancante o vuoto ──► [FAIL] + pulizia temp
//!   ├─ temp ≥ input (input > 0) ──► copia input su temp ──► promozione ──► [COPY]
//!   └─ altrimenti ──► promozione ──► [OK]
//! ```
//!
//! ## Invarianti:
//! - L'input non viene mai modificato
//! - L'output finale non è mai scritto a metà: si passa sempre dal temp
//! - Il controllo di stop avviene solo tra un file e l'altro
//! - Un fallimento non interrompe il batch

use crate::batch::job::{Job, Outcome, OutcomeKind};
use crate::batch::path_resolver::PathResolver;
use crate::batch::plan::BatchPlan;
use crate::batch::events::LogLevel;
use crate::batch::worker::WorkerContext;
use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::ghostscript::Compressor;
use crate::progress::RunSummary;
use crate::utils::truncate_diagnostic;
use filetime::FileTime;
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, warn};

/// Maximum characters of tool stderr kept in a failure diagnostic
pub const MAX_DIAGNOSTIC_CHARS: usize = 500;

/// Why a job failed, before it is turned into an `Outcome`
#[derive(Debug)]
enum JobFailure {
    Tool { exit_code: Option<i32>, stderr: String },
    NoOutput,
    Start(CompressError),
    UnreadableInput(std::io::Error),
    Filesystem(std::io::Error),
}

impl JobFailure {
    /// Ghostscript ran and left a usable output before this failure
    fn after_tool_output(&self) -> bool {
        matches!(self, Self::Filesystem(_))
    }

    fn reason(&self) -> String {
        match self {
            Self::Tool { exit_code: Some(code), .. } => format!("Ghostscript rc={}", code),
            Self::Tool { exit_code: None, .. } => "Ghostscript terminated by signal".to_string(),
            Self::NoOutput => "Ghostscript rc=0, empty or missing output".to_string(),
            Self::Start(e) => format!("Ghostscript could not start: {}", e),
            Self::UnreadableInput(e) => format!("input unreadable: {}", e),
            Self::Filesystem(e) => format!("rename/write: {}", e),
        }
    }

    fn stderr(&self) -> Option<String> {
        match self {
            Self::Tool { stderr, .. } => {
                let trimmed = truncate_diagnostic(stderr, MAX_DIAGNOSTIC_CHARS);
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    fn diagnostic(&self) -> String {
        match self.stderr() {
            Some(stderr) => format!("{}: {}", self.reason(), stderr),
            None => self.reason(),
        }
    }
}

impl From<std::io::Error> for JobFailure {
    fn from(e: std::io::Error) -> Self {
        Self::Filesystem(e)
    }
}

/// Runs every file of a `BatchPlan` through a `Compressor`
pub struct BatchOrchestrator<C: Compressor> {
    plan: BatchPlan,
    compressor: C,
}

impl<C: Compressor> BatchOrchestrator<C> {
    pub fn new(plan: BatchPlan, compressor: C) -> Self {
        Self { plan, compressor }
    }

    /// Build the Job for one enumerated input
    pub fn job_for(&self, input: &Path) -> Result<Job, CompressError> {
        let output = PathResolver::output_path(
            &self.plan.output_root.path,
            &self.plan.input_root,
            input,
        )?;

        Ok(Job {
            input: input.to_path_buf(),
            output,
            preset: self.plan.preset,
            overwrite: self.plan.overwrite,
        })
    }

    /// Process files in order until done or stopped
    pub async fn run(&self, ctx: &WorkerContext) -> RunSummary {
        let start_time = Instant::now();
        let total = self.plan.files.len();
        let mut summary = RunSummary::new(total);

        info!("Starting batch of {} PDF files", total);

        for (index, input) in self.plan.files.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                summary.stopped = true;
                info!("Stop requested, {} files left unprocessed", total - index);
                break;
            }

            let outcome = match self.job_for(input) {
                Ok(job) => self.process(&job, ctx).await,
                Err(e) => {
                    let outcome = Outcome::failed(input, input, 0, false, e.to_string());
                    ctx.events.log(
                        LogLevel::Error,
                        format!("[FAIL] {} ({})", file_name(input), e),
                        Some(outcome.clone()),
                    );
                    outcome
                }
            };

            summary.record(&outcome);
            ctx.events.progress(index + 1, total);
        }

        let duration = start_time.elapsed().as_secs_f64();
        info!(
            "Batch finished in {:.2}s: OK={} SKIP={} FAIL={}",
            duration, summary.succeeded, summary.skipped, summary.failed
        );
        ctx.events.summary(summary.clone(), duration);

        summary
    }

    /// Drive one Job to its outcome, emitting its log line(s)
    pub async fn process(&self, job: &Job, ctx: &WorkerContext) -> Outcome {
        if !job.overwrite {
            let reason = match fs::try_exists(&job.output).await {
                Ok(false) => None,
                Ok(true) => Some("already exists".to_string()),
                Err(e) => {
                    warn!("Cannot check {}: {}", job.output.display(), e);
                    Some(format!("output not checkable: {}", e))
                }
            };

            if let Some(reason) = reason {
                let outcome = Outcome::skipped(job);
                ctx.events.log(
                    LogLevel::Info,
                    format!("{} {} ({})", OutcomeKind::Skipped.tag(), file_name(&job.input), reason),
                    Some(outcome.clone()),
                );
                return outcome;
            }
        }

        let temp = PathResolver::temp_path(&job.output);
        FileManager::remove_best_effort(&temp).await;

        let input_size = match FileManager::file_size(&job.input).await {
            Ok(size) => size,
            Err(e) => return self.fail(job, 0, JobFailure::UnreadableInput(e), ctx),
        };

        match self.compress_and_promote(job, &temp, input_size).await {
            Ok(outcome) => {
                ctx.events.log(LogLevel::Info, self.success_message(job, &outcome), Some(outcome.clone()));
                outcome
            }
            Err(failure) => {
                FileManager::remove_best_effort(&temp).await;
                self.fail(job, input_size, failure, ctx)
            }
        }
    }

    async fn compress_and_promote(
        &self,
        job: &Job,
        temp: &Path,
        input_size: u64,
    ) -> Result<Outcome, JobFailure> {
        let invocation = self
            .compressor
            .compress(&job.input, temp, job.preset)
            .await
            .map_err(JobFailure::Start)?;

        if !invocation.success() {
            return Err(JobFailure::Tool {
                exit_code: invocation.exit_code,
                stderr: invocation.stderr,
            });
        }

        let temp_size = match FileManager::file_size(temp).await {
            Ok(size) if size > 0 => size,
            _ => return Err(JobFailure::NoOutput),
        };

        if temp_size >= input_size && input_size > 0 {
            debug!(
                "Compression not beneficial for {} ({} >= {})",
                job.input.display(),
                temp_size,
                input_size
            );
            copy_preserving_mtime(&job.input, temp).await?;
            promote(temp, &job.output).await?;
            return Ok(Outcome::written(job, OutcomeKind::CopiedOriginal, input_size, input_size));
        }

        promote(temp, &job.output).await?;
        let output_size = FileManager::file_size(&job.output).await?;

        Ok(Outcome::written(job, OutcomeKind::Compressed, input_size, output_size))
    }

    fn fail(&self, job: &Job, input_size: u64, failure: JobFailure, ctx: &WorkerContext) -> Outcome {
        warn!("Failed to compress {}: {}", job.input.display(), failure.reason());

        let outcome = Outcome::failed(
            &job.input,
            &job.output,
            input_size,
            failure.after_tool_output(),
            failure.diagnostic(),
        );
        ctx.events.log(
            LogLevel::Error,
            format!("{} {} ({})", OutcomeKind::Failed.tag(), file_name(&job.input), failure.reason()),
            Some(outcome.clone()),
        );
        if let Some(stderr) = failure.stderr() {
            ctx.events.log(LogLevel::Error, format!("       stderr: {}", stderr), None);
        }

        outcome
    }

    fn success_message(&self, job: &Job, outcome: &Outcome) -> String {
        let relative = self.relative_display(&job.input);
        let output_size = outcome.output_size.unwrap_or(0);
        let ratio = FileManager::size_ratio(outcome.input_size, output_size) * 100.0;

        match outcome.kind {
            OutcomeKind::CopiedOriginal => format!(
                "{} {} compression not beneficial, original copied ({})",
                outcome.kind.tag(),
                relative,
                megabytes(outcome.input_size)
            ),
            _ => format!(
                "{} {}  {} -> {}  ({:.2}%)",
                outcome.kind.tag(),
                relative,
                megabytes(outcome.input_size),
                megabytes(output_size),
                ratio
            ),
        }
    }

    fn relative_display(&self, input: &Path) -> String {
        input
            .strip_prefix(&self.plan.input_root)
            .unwrap_or(input)
            .display()
            .to_string()
    }
}

/// Replace `output` with `temp`
async fn promote(temp: &Path, output: &Path) -> std::io::Result<()> {
    match fs::remove_file(output).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::rename(temp, output).await
}

/// Copy `from` over `to`, keeping the source modification time
async fn copy_preserving_mtime(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::copy(from, to).await?;
    let metadata = fs::metadata(from).await?;
    filetime::set_file_mtime(to, FileTime::from_last_modification_time(&metadata))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn megabytes(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / 1e6)
}
