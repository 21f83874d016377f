//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare tutti gli errori possibili
//! - Separa gli errori fatali pre-run (tool, input, output) da quelli per-file
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `ToolNotFound`: Ghostscript non trovato nel PATH e nessun override valido
//! - `InvalidInput` / `InvalidOutput`: path selezionati non validi
//! - `Invocation`: impossibile avviare il processo esterno
//! - `Filesystem`: rename/copy/unlink fallito durante la promozione
//! - `Path`: file di input fuori dalla root di input
//!
//! ## Propagazione:
//! Solo gli errori pre-run interrompono l'esecuzione. Gli errori per-file
//! diventano un `Outcome::Failed` e il batch prosegue.

use std::path::PathBuf;

/// Custom error types for batch PDF compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("Ghostscript not found (searched PATH for: {0})")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    #[error("Failed to run {tool}: {source}")]
    Invocation {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem error on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not under input root {}", path.display(), root.display())]
    Path { path: PathBuf, root: PathBuf },
}

impl CompressError {
    /// Wraps an I/O error with the path it happened on
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// True for errors that prevent a run from starting
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound(_) | Self::InvalidInput(_) | Self::InvalidOutput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(CompressError::ToolNotFound("gs".to_string()).is_fatal());
        assert!(CompressError::InvalidInput("x".to_string()).is_fatal());
        assert!(CompressError::InvalidOutput("x".to_string()).is_fatal());

        let fs_error = CompressError::filesystem(
            "/tmp/out.pdf",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!fs_error.is_fatal());
        assert!(fs_error.to_string().contains("/tmp/out.pdf"));
    }

    #[test]
    fn test_path_error_message() {
        let err = CompressError::Path {
            path: PathBuf::from("/elsewhere/a.pdf"),
            root: PathBuf::from("/docs"),
        };
        assert_eq!(err.to_string(), "/elsewhere/a.pdf is not under input root /docs");
    }
}
