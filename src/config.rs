//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione di una run di compressione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri della run
//! - Fornisce valori di default sensati (preset `/ebook`, ricorsivo, overwrite)
//! - Valida i path di input e output prima di avviare il worker
//!
//! ## Parametri di configurazione:
//! - `input`: file PDF singolo o directory
//! - `output`: directory di output (default: None = stessa root dell'input,
//!   che viene poi redirezionata su `_compressed`)
//! - `preset`: livello di qualità Ghostscript (default: `/ebook`)
//! - `recursive`: scende nelle sottocartelle (default: true, ignorato per file singolo)
//! - `overwrite`: sovrascrive output esistenti (default: true)
//! - `tool_path`: path esplicito di Ghostscript (default: None = ricerca nel PATH)
//! - `json_output`: eventi come JSON lines su stdout (default: false)
//!
//! ## Validazione:
//! - L'input deve esistere ed essere una directory o un file `.pdf`
//! - L'output, se specificato, deve essere una directory esistente
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     output: Some(PathBuf::from("/out")),
//!     preset: Preset::Printer,
//!     ..Config::new("/docs")
//! };
//! config.validate()?;
//! ```

use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one compression run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Single PDF file or directory to compress
    pub input: PathBuf,
    /// Output root (None = input root, redirected to `_compressed`)
    pub output: Option<PathBuf>,
    /// Ghostscript quality preset
    pub preset: Preset,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Replace outputs that already exist
    pub overwrite: bool,
    /// Explicit Ghostscript executable
    pub tool_path: Option<PathBuf>,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Config {
    /// Configuration with default options for the given input
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            preset: Preset::default(),
            recursive: true,
            overwrite: true,
            tool_path: None,
            json_output: false,
        }
    }

    /// Validate input and output paths
    pub fn validate(&self) -> Result<(), CompressError> {
        if !self.input.exists() {
            return Err(CompressError::InvalidInput(format!(
                "input path does not exist: {}",
                self.input.display()
            )));
        }

        if self.input.is_file() {
            if !FileManager::is_pdf(&self.input) {
                return Err(CompressError::InvalidInput(format!(
                    "the selected file is not a PDF: {}",
                    self.input.display()
                )));
            }
        } else if !self.input.is_dir() {
            return Err(CompressError::InvalidInput(format!(
                "input is neither a folder nor a PDF file: {}",
                self.input.display()
            )));
        }

        if let Some(ref output) = self.output {
            if !output.is_dir() {
                return Err(CompressError::InvalidOutput(format!(
                    "output is not an existing directory: {}",
                    output.display()
                )));
            }
        }

        Ok(())
    }
}
