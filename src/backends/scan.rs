//! Directory scanning backend
//!
//! Uses walkdir for sorted, deterministic traversal

use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::paths::{normalize_path, relative_key};

/// Map every regular file under `root` to its key
///
/// Traversal is sorted by file name; when two files share a key the first one
/// visited wins.
pub fn collect_files(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let mut files = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let key = match relative_key(root, path) {
            Some(k) => k,
            None => continue,
        };

        if files.contains_key(&key) {
            debug!(key = %key, path = %normalize_path(path), "Key already taken, keeping first");
            continue;
        }
        files.insert(key, path.to_path_buf());
    }

    debug!(root = %normalize_path(root), files = files.len(), "Scanned tree");
    Ok(files)
}
