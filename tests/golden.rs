//! Golden tests for markdiff
//!
//! These tests verify that command outputs match expected golden files.
//! Golden tests ensure:
//! - Report wording stays stable across versions
//! - HTML markup stays byte-for-byte identical
//! - Tree pairing and ordering do not regress

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn tree(side: &str) -> PathBuf {
    fixtures_dir().join("tree").join(side)
}

fn expected(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join("expected").join(name))
        .expect("Failed to read golden file")
}

/// Create a command for running the markdiff binary
fn markdiff_cmd() -> Command {
    let mut cmd = Command::cargo_bin("markdiff").expect("Failed to find markdiff binary");
    cmd.arg("--no-color").env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to execute markdiff");
    assert!(
        output.status.success(),
        "markdiff failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Tree Tests ====================

    #[test]
    fn test_tree_report_golden() {
        let out = stdout_of(markdiff_cmd().arg("tree").arg(tree("old")).arg(tree("new")));
        assert_eq!(out, expected("tree_report.txt"));
    }

    #[test]
    fn test_tree_report_is_stable() {
        let first = stdout_of(markdiff_cmd().arg("tree").arg(tree("old")).arg(tree("new")));
        let second = stdout_of(markdiff_cmd().arg("tree").arg(tree("old")).arg(tree("new")));
        assert_eq!(first, second);
    }

    #[test]
    fn test_tree_against_itself_has_no_difference() {
        let out = stdout_of(markdiff_cmd().arg("tree").arg(tree("new")).arg(tree("new")));
        assert!(!out.contains("Line "));
        assert!(!out.contains("this file"));
        assert_eq!(out.matches("No difference found!").count(), 3);
    }

    // ==================== HTML Tests ====================

    #[test]
    fn test_html_golden() {
        let out = stdout_of(
            markdiff_cmd()
                .arg("file")
                .arg(tree("old").join("chapter/intro.xml"))
                .arg(tree("new").join("chapter/intro.xml"))
                .arg("--mode")
                .arg("html"),
        );
        assert_eq!(out.trim_end(), expected("intro.html").trim_end());
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_file_report_header_defaults_to_new_name() {
        let out = stdout_of(
            markdiff_cmd()
                .arg("file")
                .arg(tree("old").join("chapter/intro.xml"))
                .arg(tree("new").join("chapter/intro.xml")),
        );
        assert_eq!(out, "intro.xml\nLine 1 brave is add in new version\n");
    }
}
