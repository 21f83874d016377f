//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei PDF e le piccole operazioni sui file.
//!
//! ## Responsabilità:
//! - Enumerazione lazy e riavviabile dei PDF (`PdfFiles`)
//! - Riconoscimento estensione `.pdf` case-insensitive
//! - Lettura dimensioni file
//! - Rimozione best-effort di file temporanei
//! - Formattazione human-readable delle dimensioni
//!
//! ## Ordine di visita:
//! Directory per directory: i file di una directory (ordinati per nome)
//! vengono prima delle sue sottodirectory. L'ordine è deterministico per uno
//! snapshot del filesystem.
//!
//! ## Link simbolici:
//! I link a file vengono inclusi; i link a directory non vengono seguiti.
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = PdfFiles::new("/docs", true);
//! for pdf in files.iter() {
//!     // process pdf
//! }
//! ```

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

const PDF_EXTENSION: &str = "pdf";

/// Lazy, restartable set of eligible PDF files under a root
#[derive(Debug, Clone)]
pub struct PdfFiles {
    root: PathBuf,
    recursive: bool,
}

impl PdfFiles {
    /// `recursive` is ignored when `root` is a single file
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
        }
    }

    /// Starts a fresh traversal
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let single_file = self.root.is_file();
        let max_depth = if single_file || !self.recursive { 1 } else { usize::MAX };

        WalkDir::new(&self.root)
            .max_depth(max_depth)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
            })
            .filter(move |entry| single_file || FileManager::is_pdf(entry.path()))
            .map(|entry| entry.into_path())
    }
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Check if a path has a `.pdf` extension (any case)
    pub fn is_pdf(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(PDF_EXTENSION))
            .unwrap_or(false)
    }

    /// Size in bytes
    pub async fn file_size(path: &Path) -> std::io::Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Remove a file if present; failures are logged and swallowed
    pub async fn remove_best_effort(path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!("Could not remove {}: {}", path.display(), e),
        }
    }

    /// Get human-readable file size (decimal units)
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1000.0 && unit_index < UNITS.len() - 1 {
            size /= 1000.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Output size as a fraction of the input size
    pub fn size_ratio(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            1.0
        } else {
            new_size as f64 / original_size as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"%PDF").unwrap();
    }

    fn names(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_is_pdf() {
        assert!(FileManager::is_pdf(Path::new("a.pdf")));
        assert!(FileManager::is_pdf(Path::new("dir/B.PDF")));
        assert!(FileManager::is_pdf(Path::new("c.Pdf")));
        assert!(!FileManager::is_pdf(Path::new("d.pdf.txt")));
        assert!(!FileManager::is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_recursive_enumeration() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("b.pdf"));
        touch(&root.join("a.PDF"));
        touch(&root.join("notes.txt"));
        touch(&root.join("sub/c.pdf"));
        touch(&root.join("sub/deeper/d.pdf"));

        let files: Vec<_> = PdfFiles::new(root, true).iter().collect();
        assert_eq!(
            names(root, files),
            vec!["a.PDF", "b.pdf", "sub/c.pdf", "sub/deeper/d.pdf"]
        );
    }

    #[test]
    fn test_files_come_before_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("a.pdf"));
        touch(&root.join("m/x.pdf"));
        touch(&root.join("m/n/y.pdf"));
        touch(&root.join("m/z.pdf"));
        touch(&root.join("z.pdf"));

        let files: Vec<_> = PdfFiles::new(root, true).iter().collect();
        assert_eq!(
            names(root, files),
            vec!["a.pdf", "z.pdf", "m/x.pdf", "m/z.pdf", "m/n/y.pdf"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_pdf_is_included() {
        let temp_dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let root = temp_dir.path();
        let real = elsewhere.path().join("real.pdf");
        touch(&real);
        touch(&root.join("plain.pdf"));
        std::os::unix::fs::symlink(&real, root.join("link.pdf")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), root.join("linked-dir")).unwrap();

        let recursive: Vec<_> = PdfFiles::new(root, true).iter().collect();
        assert_eq!(names(root, recursive), vec!["link.pdf", "plain.pdf"]);

        let flat: Vec<_> = PdfFiles::new(root, false).iter().collect();
        assert_eq!(names(root, flat), vec!["link.pdf", "plain.pdf"]);
    }

    #[test]
    fn test_flat_enumeration() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("a.pdf"));
        touch(&root.join("sub/c.pdf"));

        let files: Vec<_> = PdfFiles::new(root, false).iter().collect();
        assert_eq!(names(root, files), vec!["a.pdf"]);
    }

    #[test]
    fn test_single_file_ignores_recursive_flag() {
        let temp_dir = TempDir::new().unwrap();
        let pdf = temp_dir.path().join("only.pdf");
        touch(&pdf);
        touch(&temp_dir.path().join("other.pdf"));

        let files: Vec<_> = PdfFiles::new(&pdf, true).iter().collect();
        assert_eq!(files, vec![pdf]);
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("x/1.pdf"));
        touch(&temp_dir.path().join("y/2.pdf"));

        let files = PdfFiles::new(temp_dir.path(), true);
        let first: Vec<_> = files.iter().collect();
        let second: Vec<_> = files.iter().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2_500_000), "2.50 MB");
        assert_eq!(FileManager::format_size(3_000_000_000), "3.00 GB");
    }

    #[test]
    fn test_size_ratio() {
        assert_eq!(FileManager::size_ratio(0, 10), 1.0);
        assert_eq!(FileManager::size_ratio(5_000_000, 2_000_000), 0.4);
    }

    #[tokio::test]
    async fn test_remove_best_effort_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.tmp.pdf");
        FileManager::remove_best_effort(&path).await;

        touch(&path);
        FileManager::remove_best_effort(&path).await;
        assert!(!path.exists());
    }
}
