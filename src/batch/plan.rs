//! # Batch Planning
//!
//! Fase pre-run: tutto ciò che può fallire in modo fatale avviene qui,
//! prima che il worker parta.
//!
//! ## Passi:
//! 1. Validazione della `Config` (input/output)
//! 2. Canonicalizzazione dell'input e calcolo della root di input
//! 3. Risoluzione di Ghostscript (override → PATH)
//! 4. Redirect dell'output su `_compressed` se coincide con l'input
//! 5. Enumerazione dei PDF

use crate::config::Config;
use crate::error::CompressError;
use crate::file_manager::PdfFiles;
use crate::preset::Preset;
use crate::tool_resolver::ToolPathResolver;
use crate::batch::path_resolver::{OutputRoot, PathResolver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything the worker needs, fixed before the run starts
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Root that relative output paths are computed from
    pub input_root: PathBuf,
    pub output_root: OutputRoot,
    pub tool: PathBuf,
    pub files: Vec<PathBuf>,
    pub preset: Preset,
    pub overwrite: bool,
    pub recursive: bool,
    pub single_file: bool,
}

impl BatchPlan {
    /// Validate the request and enumerate the work
    pub fn prepare(config: &Config, resolver: &ToolPathResolver) -> Result<Self, CompressError> {
        config.validate()?;

        let input = config.input.canonicalize().map_err(|e| {
            CompressError::InvalidInput(format!("{}: {}", config.input.display(), e))
        })?;
        let single_file = input.is_file();
        let input_root = if single_file {
            input
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| CompressError::InvalidInput(format!("{} has no parent", input.display())))?
        } else {
            input.clone()
        };

        let tool = resolver.resolve(config.tool_path.as_deref())?;
        info!("Ghostscript: {}", tool.display());

        let requested_output = config.output.clone().unwrap_or_else(|| input_root.clone());
        let output_root = PathResolver::resolve_output_root(&input_root, &requested_output)?;

        let recursive = config.recursive && !single_file;
        let files = Self::enumerate(&input, recursive, &output_root);
        debug!("Enumerated {} PDF files under {}", files.len(), input.display());

        Ok(Self {
            input_root,
            output_root,
            tool,
            files,
            preset: config.preset,
            overwrite: config.overwrite,
            recursive,
            single_file,
        })
    }

    /// Files under a redirected or nested output root are not inputs
    fn enumerate(input: &Path, recursive: bool, output_root: &OutputRoot) -> Vec<PathBuf> {
        let nested_output = output_root.path != input && output_root.path.starts_with(input);

        PdfFiles::new(input, recursive)
            .iter()
            .filter(|path| !(nested_output && path.starts_with(&output_root.path)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Header lines describing the run
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![format!("PDF to process: {}", self.files.len())];
        if self.single_file {
            lines.push("Single-file mode".to_string());
        }
        lines.push(format!(
            "Recursive: {} | Overwrite: {}",
            self.recursive, self.overwrite
        ));
        lines.push(format!(
            "Preset: -dCompatibilityLevel=1.4 -dPDFSETTINGS={}",
            self.preset.token()
        ));
        if self.output_root.redirected {
            lines.push(format!(
                "OUTPUT equals INPUT: using {} to avoid overwrites.",
                self.output_root.path.display()
            ));
        }
        lines
    }
}
