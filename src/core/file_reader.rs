//! File reading for compared inputs
//!
//! Handles:
//! - Non-UTF-8 files
//! - Oversized files
//! - Binary files

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Bytes inspected when sniffing for binary content
const BINARY_SNIFF_LEN: usize = 8192;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Fail on invalid UTF-8
    Strict,
    /// Use lossy conversion (replace invalid bytes with U+FFFD)
    #[default]
    Lossy,
}

/// Configuration for file reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Maximum file size to read (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Lossy,
        }
    }
}

/// What a read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    /// Contains NUL bytes near the start; never compared
    Binary,
}

/// Whether the leading bytes look binary
fn looks_binary(bytes: &[u8]) -> bool {
    let check_len = std::cmp::min(BINARY_SNIFF_LEN, bytes.len());
    bytes[..check_len].contains(&0)
}

/// Read a file as text with the given configuration
pub fn read_text_file(path: &Path, config: &FileReadConfig) -> Result<FileContent> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {}", path.display()))?;

    if metadata.len() > config.max_file_size {
        bail!(
            "File {} exceeds size limit ({} > {} bytes)",
            path.display(),
            metadata.len(),
            config.max_file_size
        );
    }

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if looks_binary(&bytes) {
        return Ok(FileContent::Binary);
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(FileContent::Text(content)),
        Err(err) => match config.encoding_strategy {
            EncodingStrategy::Strict => {
                bail!("File {} contains invalid UTF-8 sequences", path.display())
            }
            EncodingStrategy::Lossy => {
                warn!(
                    path = %path.display(),
                    "Lossy UTF-8 conversion applied (some characters replaced)"
                );
                Ok(FileContent::Text(
                    String::from_utf8_lossy(err.as_bytes()).into_owned(),
                ))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_read_utf8() {
        let file = temp_file("héllo <b>".as_bytes());
        let content = read_text_file(file.path(), &FileReadConfig::default()).unwrap();
        assert_eq!(content, FileContent::Text("héllo <b>".to_string()));
    }

    #[test]
    fn test_binary_detected() {
        let file = temp_file(b"abc\0def");
        let content = read_text_file(file.path(), &FileReadConfig::default()).unwrap();
        assert_eq!(content, FileContent::Binary);
    }

    #[test]
    fn test_nul_after_sniff_window_is_text() {
        let mut bytes = vec![b'a'; BINARY_SNIFF_LEN];
        bytes.push(0);
        let file = temp_file(&bytes);
        let content = read_text_file(file.path(), &FileReadConfig::default()).unwrap();
        assert!(matches!(content, FileContent::Text(_)));
    }

    #[test]
    fn test_lossy_conversion() {
        let file = temp_file(&[b'o', b'k', 0xff, b'!']);
        let content = read_text_file(file.path(), &FileReadConfig::default()).unwrap();
        assert_eq!(content, FileContent::Text("ok\u{FFFD}!".to_string()));
    }

    #[test]
    fn test_strict_rejects_invalid_utf8() {
        let file = temp_file(&[0xff, 0xfe, b'x']);
        let config = FileReadConfig {
            encoding_strategy: EncodingStrategy::Strict,
            ..FileReadConfig::default()
        };
        let err = read_text_file(file.path(), &config).unwrap_err();
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn test_size_limit() {
        let file = temp_file(b"0123456789");
        let config = FileReadConfig {
            max_file_size: 4,
            ..FileReadConfig::default()
        };
        let err = read_text_file(file.path(), &config).unwrap_err();
        assert!(err.to_string().contains("exceeds size limit"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text_file(&dir.path().join("nope.txt"), &FileReadConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
