//! # Background Worker
//!
//! Esegue il `BatchOrchestrator` in un task tokio separato, così la
//! superficie di controllo resta reattiva.
//!
//! ## Comunicazione:
//! - worker → controllo: `BatchEvent` su canale `mpsc` non limitato
//! - controllo → worker: `CancellationToken` (stop cooperativo tra un file e l'altro)

use crate::batch::events::{BatchEvent, EventSender};
use crate::batch::orchestrator::BatchOrchestrator;
use crate::batch::plan::BatchPlan;
use crate::ghostscript::Compressor;
use crate::progress::RunSummary;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What the orchestrator needs from the outside world
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub cancel: CancellationToken,
    pub events: EventSender,
}

/// Control side of a running batch
pub struct WorkerHandle {
    pub events: UnboundedReceiver<BatchEvent>,
    cancel: CancellationToken,
    join: JoinHandle<RunSummary>,
}

impl WorkerHandle {
    /// Token that stops the worker after the current file when cancelled
    pub fn stop_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the worker and return its summary
    pub async fn join(self) -> anyhow::Result<RunSummary> {
        Ok(self.join.await?)
    }
}

/// Start processing `plan` in the background
pub fn spawn_worker<C>(plan: BatchPlan, compressor: C) -> WorkerHandle
where
    C: Compressor + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let ctx = WorkerContext {
        cancel: cancel.clone(),
        events: EventSender::new(tx),
    };

    debug!("Spawning batch worker for {} files", plan.files.len());
    let join = tokio::spawn(async move {
        let orchestrator = BatchOrchestrator::new(plan, compressor);
        orchestrator.run(&ctx).await
    });

    WorkerHandle {
        events: rx,
        cancel,
        join,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::batch::path_resolver::OutputRoot;
    use crate::ghostscript::Ghostscript;
    use crate::preset::Preset;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Fake `gs` that writes a quarter of the input size
    fn install_fake_gs(dir: &Path) -> PathBuf {
        let script = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
  last="$arg"
done
size=$(wc -c < "$last")
head -c $((size / 4)) "$last" > "$out"
"#;
        let path = dir.join("gs");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn plan(input: &Path, output: &Path, tool: PathBuf, count: usize) -> BatchPlan {
        let files = (0..count)
            .map(|i| {
                let path = input.join(format!("doc{}.pdf", i));
                std::fs::write(&path, vec![b'p'; 4000]).unwrap();
                path
            })
            .collect();

        BatchPlan {
            input_root: input.to_path_buf(),
            output_root: OutputRoot {
                path: output.to_path_buf(),
                redirected: false,
            },
            tool,
            files,
            preset: Preset::Ebook,
            overwrite: true,
            recursive: true,
            single_file: false,
        }
    }

    #[tokio::test]
    async fn test_worker_streams_events_until_summary() {
        let tools = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let tool = install_fake_gs(tools.path());
        let plan = plan(input.path(), output.path(), tool.clone(), 3);

        let mut handle = spawn_worker(plan, Ghostscript::new(tool));

        let mut progress = Vec::new();
        let mut summary = None;
        while let Some(event) = handle.events.recv().await {
            match event {
                BatchEvent::Progress(p) => progress.push(p.completed),
                BatchEvent::Summary(s) => summary = Some(s.summary),
                BatchEvent::Log(_) => {}
            }
        }

        assert_eq!(progress, vec![1, 2, 3]);
        let summary = summary.unwrap();
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.total_out_bytes, 3000);
        assert_eq!(handle.join().await.unwrap(), summary);
    }

    #[tokio::test]
    async fn test_stop_before_start_processes_nothing() {
        let tools = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let tool = install_fake_gs(tools.path());
        let plan = plan(input.path(), output.path(), tool.clone(), 2);

        let (tx, _rx) = mpsc::unbounded_channel();
        let ctx = WorkerContext {
            cancel: CancellationToken::new(),
            events: EventSender::new(tx),
        };
        ctx.cancel.cancel();

        let summary = BatchOrchestrator::new(plan, Ghostscript::new(tool)).run(&ctx).await;
        assert!(summary.stopped);
        assert_eq!(summary.processed(), 0);
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
