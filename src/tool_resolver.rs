//! # Ghostscript Path Resolver
//!
//! Finds the Ghostscript executable used for compression:
//! - Explicit path given by the user (if it exists)
//! - System PATH, trying each known executable name in order

use crate::error::CompressError;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Executable names searched on the system path, in priority order
pub const GHOSTSCRIPT_CANDIDATES: [&str; 4] = ["gswin64c", "gswin64c.exe", "gs", "gs.exe"];

/// Tool path resolver for Ghostscript
pub struct ToolPathResolver {
    /// Value of PATH to search (None when PATH is unset)
    search_path: Option<OsString>,
}

impl ToolPathResolver {
    /// Create a resolver over the process PATH
    pub fn new() -> Self {
        Self {
            search_path: env::var_os("PATH"),
        }
    }

    /// Create a resolver over an explicit PATH-style value
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    /// Resolve the tool, preferring `override_path` when it exists
    pub fn resolve(&self, override_path: Option<&Path>) -> Result<PathBuf, CompressError> {
        if let Some(path) = override_path {
            if path.exists() {
                debug!("Using Ghostscript override: {}", path.display());
                return Ok(path.to_path_buf());
            }
            warn!(
                "Ghostscript override {} does not exist, searching PATH instead",
                path.display()
            );
        }

        self.find_in_system_path()
            .ok_or_else(|| CompressError::ToolNotFound(GHOSTSCRIPT_CANDIDATES.join(", ")))
    }

    /// First candidate found on the search path
    pub fn find_in_system_path(&self) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        let dirs: Vec<PathBuf> = env::split_paths(search_path).collect();

        for name in GHOSTSCRIPT_CANDIDATES {
            for dir in &dirs {
                let candidate = dir.join(name);
                if is_executable(&candidate) {
                    debug!("Found Ghostscript: {}", candidate.display());
                    return Some(candidate);
                }
            }
        }

        debug!("No Ghostscript candidate on PATH");
        None
    }
}

impl Default for ToolPathResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
