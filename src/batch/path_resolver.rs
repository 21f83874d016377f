//! # Path Resolution Module
//!
//! Centralizza tutta la logica di calcolo dei path di output:
//! struttura speculare dell'input, redirect su `_compressed` quando
//! output e input coincidono, path temporanei.

use crate::error::CompressError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subdirectory used when the output root equals the input root
pub const REDIRECT_DIR_NAME: &str = "_compressed";

/// Extension given to in-progress outputs
pub const TEMP_EXTENSION: &str = "tmp.pdf";

/// Effective output root after the equality check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoot {
    pub path: PathBuf,
    /// The requested root equalled the input root and was replaced
    pub redirected: bool,
}

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// `output_root / input.strip_prefix(input_root)`, creating parent directories
    pub fn output_path(
        output_root: &Path,
        input_root: &Path,
        input: &Path,
    ) -> Result<PathBuf, CompressError> {
        let relative = input
            .strip_prefix(input_root)
            .map_err(|_| CompressError::Path {
                path: input.to_path_buf(),
                root: input_root.to_path_buf(),
            })?;

        let result = output_root.join(relative);
        Self::ensure_parent_dirs(&result)?;
        debug!("Resolved output path: {} -> {}", input.display(), result.display());

        Ok(result)
    }

    /// Redirect to `<target>/_compressed` when `output_root` resolves to `target`.
    ///
    /// `target` is the input directory, or the input file's parent in
    /// single-file mode.
    pub fn resolve_output_root(
        target: &Path,
        output_root: &Path,
    ) -> Result<OutputRoot, CompressError> {
        let canonical_target = target
            .canonicalize()
            .map_err(|e| CompressError::filesystem(target, e))?;
        let canonical_output = output_root
            .canonicalize()
            .map_err(|_| {
                CompressError::InvalidOutput(format!(
                    "output directory cannot be resolved: {}",
                    output_root.display()
                ))
            })?;

        if canonical_target != canonical_output {
            return Ok(OutputRoot {
                path: canonical_output,
                redirected: false,
            });
        }

        let redirected = canonical_target.join(REDIRECT_DIR_NAME);
        std::fs::create_dir_all(&redirected)
            .map_err(|e| CompressError::filesystem(&redirected, e))?;
        debug!(
            "Output equals input ({}), redirecting to {}",
            canonical_target.display(),
            redirected.display()
        );

        Ok(OutputRoot {
            path: redirected,
            redirected: true,
        })
    }

    /// In-progress path next to the final output (`a.pdf` -> `a.tmp.pdf`)
    pub fn temp_path(output: &Path) -> PathBuf {
        output.with_extension(TEMP_EXTENSION)
    }

    /// Crea le directory parent se necessario
    pub fn ensure_parent_dirs(path: &Path) -> Result<(), CompressError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CompressError::filesystem(parent, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_mirrors_structure() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("sub/deeper/b.pdf");

        let result = PathResolver::output_path(output_dir.path(), input_dir.path(), &input).unwrap();

        assert_eq!(result, output_dir.path().join("sub/deeper/b.pdf"));
        assert!(output_dir.path().join("sub/deeper").is_dir());
    }

    #[test]
    fn test_output_path_outside_root() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let result = PathResolver::output_path(
            output_dir.path(),
            input_dir.path(),
            Path::new("/somewhere/else.pdf"),
        );
        assert!(matches!(result, Err(CompressError::Path { .. })));
    }

    #[test]
    fn test_redirect_when_output_equals_input() {
        let input_dir = TempDir::new().unwrap();
        let same_via_dot = input_dir.path().join(".");

        let root = PathResolver::resolve_output_root(input_dir.path(), &same_via_dot).unwrap();

        assert!(root.redirected);
        assert_eq!(root.path.file_name().unwrap(), REDIRECT_DIR_NAME);
        assert!(root.path.is_dir());
        assert_eq!(
            root.path.parent().unwrap(),
            input_dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_no_redirect_for_distinct_output() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let root = PathResolver::resolve_output_root(input_dir.path(), output_dir.path()).unwrap();

        assert!(!root.redirected);
        assert_eq!(root.path, output_dir.path().canonicalize().unwrap());
        assert!(!input_dir.path().join(REDIRECT_DIR_NAME).exists());
    }

    #[test]
    fn test_output_subdirectory_of_input_is_not_redirected() {
        let input_dir = TempDir::new().unwrap();
        let nested = input_dir.path().join("out");
        std::fs::create_dir(&nested).unwrap();

        let root = PathResolver::resolve_output_root(input_dir.path(), &nested).unwrap();
        assert!(!root.redirected);
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            PathResolver::temp_path(Path::new("/out/sub/a.pdf")),
            PathBuf::from("/out/sub/a.tmp.pdf")
        );
        assert_eq!(
            PathResolver::temp_path(Path::new("/out/B.PDF")),
            PathBuf::from("/out/B.tmp.pdf")
        );
    }
}
