//! # PDF Compressor Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `preset`: Preset di qualità Ghostscript
//! - `tool_resolver`: Ricerca dell'eseguibile Ghostscript
//! - `file_manager`: Discovery dei PDF e operazioni sui file
//! - `ghostscript`: Invocazione del processo esterno
//! - `batch`: Pianificazione, orchestrazione e worker in background
//! - `progress`: Progress bar e statistiche aggregate
//! - `json_output`: Output JSON per uso programmatico
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use pdf_compressor::{spawn_worker, BatchPlan, Config, Ghostscript, ToolPathResolver};
//!
//! let config = Config::new("/docs");
//! let plan = BatchPlan::prepare(&config, &ToolPathResolver::new())?;
//! let tool = Ghostscript::new(&plan.tool);
//! let handle = spawn_worker(plan, tool);
//! let summary = handle.join().await?;
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod ghostscript;
pub mod json_output;
pub mod preset;
pub mod progress;
pub mod tool_resolver;
pub mod utils;

pub use batch::{spawn_worker, BatchEvent, BatchPlan, Outcome, OutcomeKind, WorkerHandle};
pub use config::Config;
pub use error::CompressError;
pub use ghostscript::{Compressor, Ghostscript};
pub use preset::Preset;
pub use progress::RunSummary;
pub use tool_resolver::ToolPathResolver;
