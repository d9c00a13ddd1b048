//! Text normalization and tokenization
//!
//! Turns raw file content into the space-separated token stream the aligner
//! works on. Markup-significant characters are escaped, line terminators
//! become a standalone `<br>` token and whitespace runs collapse to one space.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::model::BREAK_MARKER;

/// Runs of two or more spaces
static MULTI_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {2,}").expect("Invalid MULTI_SPACE regex"));

/// Normalize raw text into a single line of space-separated tokens
pub fn normalize(text: &str) -> String {
    let marker = format!(" {} ", BREAK_MARKER);
    let escaped = text
        .trim()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", &marker)
        .replace(['\r', '\n'], &marker)
        .replace('\t', " ");

    MULTI_SPACE.replace_all(&escaped, " ").trim().to_string()
}

/// Split normalized text into tokens
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fold tags whose opening part spans several physical lines into one line.
///
/// A line that does not end with `>` is joined with the lines after it until
/// one does. Fragments are trimmed and joined with one space; blank lines are
/// dropped. Spaces next to `>` and `/>` are removed from every emitted line.
pub fn fold_open_tags(text: &str) -> String {
    let mut folded: Vec<String> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let line = line.trim();
        pending.push(line);
        if line.ends_with('>') {
            folded.push(tighten_tag_edges(&pending.join(" ")));
            pending.clear();
        }
    }

    // Text ended inside a tag
    if !pending.is_empty() {
        folded.push(tighten_tag_edges(&pending.join(" ")));
    }

    folded.join("\n")
}

fn tighten_tag_edges(line: &str) -> String {
    line.replace(" />", "/>").replace(" >", ">").replace("> ", ">")
}
