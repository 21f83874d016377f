//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso programmatico
//! della CLI (`--json`): una riga JSON per evento su stdout.
//!
//! ## Responsabilità:
//! - Traduce i `BatchEvent` del worker in messaggi JSON
//! - Fornisce interfaccia standardizzata per comunicazione inter-processo
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio della run (piano e configurazione)
//! - `log`: Riga di log, con l'outcome strutturato se riguarda un file
//! - `progress`: Progresso corrente
//! - `complete`: Fine della run con statistiche finali
//! - `error`: Errore fatale prima o durante la run

use crate::batch::{BatchEvent, BatchPlan, LogLevel, Outcome};
use crate::preset::Preset;
use crate::progress::RunSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio della run
    #[serde(rename = "start")]
    Start {
        input_root: PathBuf,
        output_root: PathBuf,
        redirected: bool,
        tool: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    /// Riga di log del worker
    #[serde(rename = "log")]
    Log {
        level: LogLevel,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        outcome: Option<Outcome>,
    },

    /// Progresso corrente
    #[serde(rename = "progress")]
    Progress {
        completed: usize,
        total: usize,
        percentage: f64,
    },

    /// Run completata o fermata
    #[serde(rename = "complete")]
    Complete {
        summary: RunSummary,
        saved_bytes: u64,
        saved_ratio: Option<f64>,
        duration_seconds: f64,
    },

    /// Errore fatale
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub preset: Preset,
    pub recursive: bool,
    pub overwrite: bool,
    pub single_file: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio dal piano
    pub fn start(plan: &BatchPlan) -> Self {
        Self::Start {
            input_root: plan.input_root.clone(),
            output_root: plan.output_root.path.clone(),
            redirected: plan.output_root.redirected,
            tool: plan.tool.clone(),
            total_files: plan.files.len(),
            config: JsonConfig::from(plan),
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

impl From<BatchEvent> for JsonMessage {
    fn from(event: BatchEvent) -> Self {
        match event {
            BatchEvent::Log(log) => Self::Log {
                level: log.level,
                message: log.message,
                outcome: log.outcome,
            },
            BatchEvent::Progress(progress) => Self::Progress {
                completed: progress.completed,
                total: progress.total,
                percentage: progress.percentage(),
            },
            BatchEvent::Summary(done) => Self::Complete {
                saved_bytes: done.summary.saved_bytes(),
                saved_ratio: done.summary.saved_ratio(),
                summary: done.summary,
                duration_seconds: done.duration_seconds,
            },
        }
    }
}

/// Effective options of a prepared plan
impl From<&BatchPlan> for JsonConfig {
    fn from(plan: &BatchPlan) -> Self {
        Self {
            preset: plan.preset,
            recursive: plan.recursive,
            overwrite: plan.overwrite,
            single_file: plan.single_file,
        }
    }
}
