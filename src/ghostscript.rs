//! # Ghostscript Invoker Module
//!
//! Questo modulo è l'unico punto di accoppiamento con la command line di
//! Ghostscript.
//!
//! ## Responsabilità:
//! - Costruzione degli argomenti (`-sDEVICE=pdfwrite`, preset, output, input)
//! - Avvio del processo con `tokio::process::Command`
//! - Cattura di exit code, stdout e stderr
//!
//! ## Contratto:
//! Un exit code diverso da zero NON è un errore: viene restituito al
//! chiamante dentro `Invocation`. Solo l'impossibilità di avviare il processo
//! produce `CompressError::Invocation`.
//!
//! Nessun timeout: un Ghostscript bloccato blocca il batch.
//!
//! ## Comando:
//! ```text
//! gs -sDEVICE=pdfwrite -dCompatibilityLevel=1.4 -dPDFSETTINGS=/ebook \
//!    -dNOPAUSE -dQUIET -dBATCH -sOutputFile=out.pdf in.pdf
//! ```

use crate::error::CompressError;
use crate::os_args;
use crate::preset::Preset;
use crate::utils::flag_with_value;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Exit code (None when terminated by a signal)
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that can rewrite `input` into a (hopefully smaller) `output`
pub trait Compressor: Send + Sync {
    fn compress(
        &self,
        input: &Path,
        output: &Path,
        preset: Preset,
    ) -> impl Future<Output = Result<Invocation, CompressError>> + Send;
}

/// Ghostscript `pdfwrite` compressor
#[derive(Debug, Clone)]
pub struct Ghostscript {
    executable: PathBuf,
}

impl Ghostscript {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Argument vector for one input/output pair
    pub fn build_args(input: &Path, output: &Path, preset: Preset) -> Vec<OsString> {
        let mut args = os_args![
            "-sDEVICE=pdfwrite",
            "-dCompatibilityLevel=1.4",
            format!("-dPDFSETTINGS={}", preset.token()),
            "-dNOPAUSE",
            "-dQUIET",
            "-dBATCH",
        ];
        args.push(flag_with_value("-sOutputFile=", output));
        args.push(input.as_os_str().to_os_string());
        args
    }
}

impl Compressor for Ghostscript {
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        preset: Preset,
    ) -> Result<Invocation, CompressError> {
        let args = Self::build_args(input, output, preset);
        let start_time = Instant::now();

        let output_data = Command::new(&self.executable)
            .args(&args)
            .output()
            .await
            .map_err(|source| CompressError::Invocation {
                tool: self.executable.clone(),
                source,
            })?;

        debug!(
            "Ghostscript finished {} in {:?} (status: {})",
            input.display(),
            start_time.elapsed(),
            output_data.status
        );

        Ok(Invocation {
            exit_code: output_data.status.code(),
            stdout: String::from_utf8_lossy(&output_data.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output_data.stderr).into_owned(),
        })
    }
}
