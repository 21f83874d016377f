//! # Batch Module
//!
//! Separa le responsabilità del batch in sottomoduli:
//! - `plan`: Validazione pre-run ed enumerazione
//! - `job`: Job e Outcome di un singolo file
//! - `orchestrator`: Ciclo sequenziale per file
//! - `worker`: Esecuzione in background con stop cooperativo
//! - `events`: Messaggi worker → superficie di controllo
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod events;
pub mod job;
pub mod orchestrator;
pub mod path_resolver;
pub mod plan;
pub mod worker;

pub use events::{BatchEvent, EventSender, LogLevel};
pub use job::{Job, Outcome, OutcomeKind};
pub use orchestrator::BatchOrchestrator;
pub use path_resolver::PathResolver;
pub use plan::BatchPlan;
pub use worker::{spawn_worker, WorkerContext, WorkerHandle};
