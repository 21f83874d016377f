//! # PDF Compressor - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Pianificazione della run (validazione, Ghostscript, enumerazione)
//! - Avvio del worker e rendering degli eventi (progress bar o JSON)
//! - Gestione di Ctrl-C come richiesta di stop
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (input, output, preset, flag)
//! 2. Configura il logging (RUST_LOG, altrimenti INFO o DEBUG con --verbose)
//! 3. Prepara il `BatchPlan`; gli errori di validazione terminano qui
//! 4. Avvia il worker in background
//! 5. Ogni 100 ms drena la coda degli eventi e aggiorna l'output
//! 6. Stampa il riepilogo finale
//!
//! ## Esempio di utilizzo:
//! ```bash
//! pdf-compressor ~/Documents/scans -o ~/Documents/small --preset screen --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdf_compressor::json_output::JsonMessage;
use pdf_compressor::progress::ProgressManager;
use pdf_compressor::{spawn_worker, BatchEvent, BatchPlan, Config, Ghostscript, Preset, ToolPathResolver};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "pdf-compressor")]
#[command(about = "Compress PDF files in batch with Ghostscript")]
struct Args {
    /// PDF file or directory containing PDF files
    input: PathBuf,

    /// Output directory (default: <input>/_compressed)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Quality preset passed to -dPDFSETTINGS
    #[arg(short, long, value_enum, default_value = "ebook")]
    preset: Preset,

    /// Only process PDF files directly inside the input directory
    #[arg(long)]
    no_recursive: bool,

    /// Skip files whose output already exists
    #[arg(long)]
    skip_existing: bool,

    /// Path to the Ghostscript executable (default: search PATH)
    #[arg(long = "gs", value_name = "PATH")]
    gs: Option<PathBuf>,

    /// Output progress and status as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// How worker events reach the user
enum Renderer {
    Human(ProgressManager),
    Json,
}

impl Renderer {
    /// True when the event ends the run
    fn render(&self, event: BatchEvent) -> bool {
        match self {
            Self::Json => {
                let done = matches!(event, BatchEvent::Summary(_));
                JsonMessage::from(event).emit();
                done
            }
            Self::Human(bar) => match event {
                BatchEvent::Log(log) => {
                    bar.println(&log.message);
                    false
                }
                BatchEvent::Progress(progress) => {
                    bar.set_position(progress.completed as u64);
                    false
                }
                BatchEvent::Summary(done) => {
                    bar.finish(if done.summary.stopped { "Stopped" } else { "Done" });
                    println!();
                    println!("{}", done.summary.format_counts());
                    println!("{}", done.summary.format_savings());
                    if done.summary.stopped {
                        println!("Stopped: {} files not processed", done.summary.unprocessed());
                    }
                    true
                }
            },
        }
    }

    fn notice(&self, message: &str) {
        match self {
            Self::Json => JsonMessage::from(BatchEvent::warn(message)).emit(),
            Self::Human(bar) => bar.println(message),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Create output directory if specified
    if let Some(ref output_dir) = args.output {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)?;
            info!("Created output directory: {}", output_dir.display());
        }
    }

    let config = Config {
        output: args.output,
        preset: args.preset,
        recursive: !args.no_recursive,
        overwrite: !args.skip_existing,
        tool_path: args.gs,
        json_output: args.json,
        ..Config::new(args.input)
    };

    let plan = match BatchPlan::prepare(&config, &ToolPathResolver::new()) {
        Ok(plan) => plan,
        Err(e) => {
            if config.json_output {
                JsonMessage::error(e.to_string(), None).emit();
            }
            return Err(e.into());
        }
    };

    if config.json_output {
        JsonMessage::start(&plan).emit();
    } else {
        for line in plan.describe() {
            println!("{}", line);
        }
    }

    if plan.is_empty() {
        if config.json_output {
            JsonMessage::error("No PDF found".to_string(), Some(plan.input_root.display().to_string())).emit();
        } else {
            println!("No PDF found");
        }
        return Ok(());
    }

    let renderer = if config.json_output {
        Renderer::Json
    } else {
        Renderer::Human(ProgressManager::new(plan.files.len() as u64))
    };

    let compressor = Ghostscript::new(&plan.tool);
    let mut handle = spawn_worker(plan, compressor);

    let stop = handle.stop_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.cancel();
        }
    });

    let stop = handle.stop_token();
    let mut stop_announced = false;
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    'poll: loop {
        tokio::select! {
            _ = stop.cancelled(), if !stop_announced => {
                stop_announced = true;
                renderer.notice("STOP requested... (finishes after current file)");
            }
            _ = ticker.tick() => {
                loop {
                    match handle.events.try_recv() {
                        Ok(event) => {
                            if renderer.render(event) {
                                break 'poll;
                            }
                        }
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => break 'poll,
                    }
                }
            }
        }
    }

    let summary = handle.join().await?;
    info!(
        "Processed {}/{} files ({} failed)",
        summary.processed(),
        summary.total,
        summary.failed
    );

    Ok(())
}
