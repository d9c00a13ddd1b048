//! Side-by-side HTML rendering

use crate::core::model::{LineEnd, LinePair, LineUnit, Span, SpanTag, Theme};

/// Style shared by both columns
pub const COLUMN_STYLE: &str = "float:left;width:50%;overflow:scroll;white-space: nowrap;";

fn styled(color: &str, body: &str) -> String {
    format!("<span style=\"background-color:{}\">{}</span>", color, body)
}

/// Render one span; matched spans carry no style
pub fn render_span(span: &Span, theme: &Theme) -> String {
    let body = format!("{} ", span.text());
    match theme.color_for(span.tag) {
        Some(color) => styled(color, &body),
        None => format!("<span>{}</span>", body),
    }
}

fn render_end(end: LineEnd, theme: &Theme) -> String {
    match end {
        LineEnd::Open => String::new(),
        LineEnd::Break(SpanTag::Match) => "<br>".to_string(),
        LineEnd::Break(tag) => match theme.color_for(tag) {
            Some(color) => styled(color, "<br>"),
            None => "<br>".to_string(),
        },
        LineEnd::Synthetic => styled(&theme.edited, "<br>"),
    }
}

/// Render one line unit including its closing break
pub fn render_line(line: &LineUnit, theme: &Theme) -> String {
    let mut out: String = line
        .spans
        .iter()
        .map(|span| render_span(span, theme))
        .collect();
    if line.is_filler() {
        out.push_str(&styled(&theme.edited, "&nbsp;"));
    }
    out.push_str(&render_end(line.end, theme));
    out
}

/// Render the changed spans of a line only
pub fn render_changes(line: &LineUnit, theme: &Theme) -> String {
    line.changed_spans()
        .map(|span| render_span(span, theme))
        .collect()
}

fn render_column<'a>(lines: impl Iterator<Item = &'a LineUnit>, theme: &Theme) -> String {
    let body: String = lines.map(|line| render_line(line, theme)).collect();
    format!("<div style=\"{}\">{}</div>", COLUMN_STYLE, body)
}

/// Render both sides as two floating columns
pub fn render_side_by_side(rows: &[LinePair], theme: &Theme) -> String {
    let left = render_column(rows.iter().map(|row| &row.left), theme);
    let right = render_column(rows.iter().map(|row| &row.right), theme);
    left + &right
}
