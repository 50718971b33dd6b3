//! Controller source discovery.
//!
//! The scanner walks a directory tree looking for directories literally
//! named [`CONTROLLER_DIR_NAME`] and collects every Rust source file
//! beneath them. Once a controller directory is found its whole subtree is
//! consumed, so a second `controller` directory nested inside it is not
//! treated as a fresh controller root; sibling traversal continues
//! elsewhere in the tree.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory name that marks a controller package root.
pub const CONTROLLER_DIR_NAME: &str = "controller";

/// Extension of source files handed to the declaration extractor.
pub const SOURCE_EXTENSION: &str = "rs";

/// Scanner for locating controller source files under an API root.
///
/// Both the outer walk (looking for controller directories) and the inner
/// walk (collecting files) are sorted by file name, so discovery order is
/// stable across filesystems. Alias numbering and registration order
/// downstream inherit that stability.
pub struct ControllerScanner {
    root_path: PathBuf,
}

impl ControllerScanner {
    /// Creates a scanner rooted at `root_path`.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the tree and returns every controller source file, in
    /// deterministic order.
    ///
    /// Directories that cannot be opened or read are logged and skipped;
    /// other controllers may still be discoverable, so traversal errors
    /// are never fatal here.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("directory access error: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() && entry.file_name() == CONTROLLER_DIR_NAME {
                debug!("controller directory: {}", entry.path().display());
                collect_source_files(entry.path(), &mut files);
                walker.skip_current_dir();
            }
        }

        files
    }
}

/// Collects every source file beneath a controller directory.
fn collect_source_files(dir: &Path, files: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("directory access error: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
}
