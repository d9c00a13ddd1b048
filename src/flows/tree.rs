//! Tree comparison flow
//!
//! Pairs the files of two directory trees by key, compares each shared pair in
//! report mode and lists the keys present on only one side.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backends::scan::collect_files;
use crate::core::compare::{compare_texts, CompareOptions};
use crate::core::file_reader::{read_text_file, FileContent, FileReadConfig};
use crate::core::model::Theme;
use crate::core::report::{entries, render_report, LINE_SEPARATOR};

/// Options shared by every file pair of a tree run
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub read: FileReadConfig,
    pub compare: CompareOptions,
    pub theme: Theme,
}

fn missing_line(key: &str) -> String {
    format!("this file {} is missing", key)
}

fn added_line(key: &str) -> String {
    format!("this file {} is add in new version", key)
}

fn binary_line(key: &str) -> String {
    format!("this file {} is binary and was skipped", key)
}

/// Report text for one shared key, including the trailing separator
fn compare_pair(key: &str, old: &Path, new: &Path, options: &TreeOptions) -> Result<String> {
    let old_content = read_text_file(old, &options.read)?;
    let new_content = read_text_file(new, &options.read)?;

    let (old_text, new_text) = match (old_content, new_content) {
        (FileContent::Text(o), FileContent::Text(n)) => (o, n),
        _ => {
            info!(key, "Skipping binary file");
            return Ok(format!("{}{}", binary_line(key), LINE_SEPARATOR));
        }
    };

    let comparison = compare_texts(&old_text, &new_text, key, &options.compare)
        .with_context(|| format!("Failed to compare {}", key))?;
    let entries = entries(&comparison.rows, &options.theme);
    Ok(format!("{}{}", render_report(key, &entries), LINE_SEPARATOR))
}

/// Reports of all shared keys in key order
fn compare_shared(
    shared: &[(&String, &PathBuf, &PathBuf)],
    options: &TreeOptions,
) -> Result<Vec<String>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        shared
            .par_iter()
            .map(|(key, old, new)| compare_pair(key, old, new, options))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        shared
            .iter()
            .map(|(key, old, new)| compare_pair(key, old, new, options))
            .collect()
    }
}

/// Merge two scanned trees into one report
pub fn merge_trees(
    old_files: &BTreeMap<String, PathBuf>,
    new_files: &BTreeMap<String, PathBuf>,
    options: &TreeOptions,
) -> Result<String> {
    let shared: Vec<(&String, &PathBuf, &PathBuf)> = old_files
        .iter()
        .filter_map(|(key, old)| new_files.get(key).map(|new| (key, old, new)))
        .collect();
    debug!(
        old = old_files.len(),
        new = new_files.len(),
        shared = shared.len(),
        "Pairing trees"
    );

    let mut out = String::new();
    for report in compare_shared(&shared, options)? {
        out.push_str(&report);
    }

    for key in old_files.keys().filter(|k| !new_files.contains_key(*k)) {
        out.push_str(&missing_line(key));
        out.push_str(LINE_SEPARATOR);
    }
    for key in new_files.keys().filter(|k| !old_files.contains_key(*k)) {
        out.push_str(&added_line(key));
        out.push_str(LINE_SEPARATOR);
    }

    Ok(out)
}

/// Compare two directory trees
pub fn compare_trees(old_root: &Path, new_root: &Path, options: &TreeOptions) -> Result<String> {
    let old_files = collect_files(old_root)
        .with_context(|| format!("Failed to scan {}", old_root.display()))?;
    let new_files = collect_files(new_root)
        .with_context(|| format!("Failed to scan {}", new_root.display()))?;
    merge_trees(&old_files, &new_files, options)
}

/// Write the merged report to a file, replacing any existing one
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    fs::write(path, report).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Report written");
    Ok(())
}
