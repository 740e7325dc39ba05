//! Bounded search for item roots.
//!
//! A folder is an item root when a marker file sits directly inside it.
//! The walk stops descending as soon as it finds one, so items are never
//! nested inside other items.

use crate::errors::LintError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::MARKER_FILE;

/// Depth bound used for the top-level scan of a root path
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Whether `path` directly contains a marker file
pub fn is_item_root(path: &Path) -> bool {
    path.join(MARKER_FILE).is_file()
}

/// Find every item root under `root`, looking at most `max_depth` levels down.
///
/// Unreadable folders are logged and skipped; the rest of the tree is still
/// searched. Results come back in file-name order.
pub fn scan(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();

    let mut walker = WalkDir::new(root)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                match err.into_io_error() {
                    Some(source) => warn!("{}", LintError::UnreadableDirectory { path, source }),
                    None => warn!("Skipping {}: filesystem loop", path.display()),
                }
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if is_item_root(entry.path()) {
            debug!("Found item root {}", entry.path().display());
            found.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }

    found
}
