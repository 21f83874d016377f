//! # Batch Events
//!
//! Messaggi inviati dal worker alla superficie di controllo tramite canale
//! `mpsc` non bloccante. L'insieme è chiuso: log, progresso, riepilogo.

use crate::batch::job::Outcome;
use crate::progress::RunSummary;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// A human-readable log line, optionally carrying the structured outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

/// `completed` of `total` files have an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
}

impl ProgressEvent {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.completed as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Final aggregate, sent once when the run ends or stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEvent {
    pub summary: RunSummary,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatchEvent {
    Log(LogEvent),
    Progress(ProgressEvent),
    Summary(SummaryEvent),
}

impl BatchEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Log(LogEvent {
            level: LogLevel::Info,
            message: message.into(),
            outcome: None,
        })
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::Log(LogEvent {
            level: LogLevel::Warn,
            message: message.into(),
            outcome: None,
        })
    }
}

/// Sending half owned by the worker; never blocks
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<BatchEvent>,
}

impl EventSender {
    pub fn new(tx: UnboundedSender<BatchEvent>) -> Self {
        Self { tx }
    }

    /// A closed receiver is not an error for the worker
    pub fn send(&self, event: BatchEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Event receiver dropped, event discarded");
        }
    }

    pub fn log(&self, level: LogLevel, message: String, outcome: Option<Outcome>) {
        self.send(BatchEvent::Log(LogEvent {
            level,
            message,
            outcome,
        }));
    }

    pub fn progress(&self, completed: usize, total: usize) {
        self.send(BatchEvent::Progress(ProgressEvent { completed, total }));
    }

    pub fn summary(&self, summary: RunSummary, duration_seconds: f64) {
        self.send(BatchEvent::Summary(SummaryEvent {
            summary,
            duration_seconds,
        }));
    }
}
