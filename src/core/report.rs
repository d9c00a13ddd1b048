//! Per-line change report
//!
//! Each row is reduced to plain text by rendering it and stripping the
//! wrapper tags again, so the report reads exactly what the HTML view shows.

use crate::core::html::{render_changes, render_line};
use crate::core::markup::plain_text;
use crate::core::model::{ChangeKind, DiffReportEntry, LinePair, Theme};

/// Line separator used between report lines
pub const LINE_SEPARATOR: &str = "\n";

/// Report body when nothing changed
pub const NO_DIFFERENCE: &str = "No difference found!";

fn plain(html: &str) -> String {
    plain_text(html).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify one row
pub fn classify(line: usize, row: &LinePair, theme: &Theme) -> DiffReportEntry {
    let full_left = plain(&render_line(&row.left, theme));
    let full_right = plain(&render_line(&row.right, theme));
    let left = plain(&render_changes(&row.left, theme));
    let right = plain(&render_changes(&row.right, theme));

    let kind = if full_left == full_right {
        ChangeKind::Unchanged
    } else {
        match (left.is_empty(), right.is_empty()) {
            (true, false) => ChangeKind::Added,
            (false, true) => ChangeKind::Missing,
            (false, false) => ChangeKind::Edited,
            (true, true) => ChangeKind::Unchanged,
        }
    };

    DiffReportEntry {
        line,
        kind,
        left,
        right,
    }
}

/// Classify every row, numbering from 1
pub fn entries(rows: &[LinePair], theme: &Theme) -> Vec<DiffReportEntry> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| classify(index + 1, row, theme))
        .collect()
}

/// The report line for an entry, `None` for unchanged rows
pub fn format_entry(entry: &DiffReportEntry) -> Option<String> {
    match entry.kind {
        ChangeKind::Added => Some(format!(
            "Line {} {} is add in new version",
            entry.line, entry.right
        )),
        ChangeKind::Missing => Some(format!(
            "Line {} {} is missing in new version",
            entry.line, entry.left
        )),
        ChangeKind::Edited => Some(format!(
            "Line {} element {} is edit to {} in new version",
            entry.line, entry.left, entry.right
        )),
        ChangeKind::Unchanged => None,
    }
}

/// Render the textual report for one file
pub fn render_report(name: &str, entries: &[DiffReportEntry]) -> String {
    let mut out = format!("{}{}", name, LINE_SEPARATOR);
    let body: Vec<String> = entries.iter().filter_map(format_entry).collect();

    if body.is_empty() {
        out.push_str(NO_DIFFERENCE);
    } else {
        for line in body {
            out.push_str(&line);
            out.push_str(LINE_SEPARATOR);
        }
    }
    out
}
