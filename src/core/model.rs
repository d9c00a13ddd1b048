//! Diff data model
//!
//! Every stage of the pipeline speaks in these types: tokens flow into the
//! aligner, tagged spans come out of the segment renderer, and line pairs come
//! out of the reconciler for the HTML/report renderers to consume.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The visible line-break marker produced by normalization.
pub const BREAK_MARKER: &str = "<br>";

/// Whether a token is the line-break marker
pub fn is_break(token: &str) -> bool {
    token == BREAK_MARKER
}

/// Which version of the document a piece of data belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The old version
    Left,
    /// The new version
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Classification of a run of tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanTag {
    /// Present on both sides
    Match,
    /// Left-only
    Deleted,
    /// Right-only
    Inserted,
    /// Matched content displaced onto a borrowed line
    Neutral,
}

impl SpanTag {
    pub fn is_changed(self) -> bool {
        matches!(self, SpanTag::Deleted | SpanTag::Inserted)
    }
}

/// A contiguous run of tokens sharing one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub tag: SpanTag,
    pub tokens: Vec<String>,
}

impl Span {
    pub fn new(tag: SpanTag, token: impl Into<String>) -> Self {
        Self {
            tag,
            tokens: vec![token.into()],
        }
    }

    /// Tokens joined by single spaces
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Append a token to a span list, extending the last span when the tag agrees
fn push_coalesced(spans: &mut Vec<Span>, tag: SpanTag, token: &str) {
    match spans.last_mut() {
        Some(last) if last.tag == tag => last.tokens.push(token.to_string()),
        _ => spans.push(Span::new(tag, token)),
    }
}

/// One element of a side's rendered stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Span(Span),
    /// A break marker injected to mirror a break skipped on the far side
    Borrowed,
}

/// A flattened view of a segment stream: one token or one borrowed break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Token(SpanTag, &'a str),
    Borrowed,
}

impl Cell<'_> {
    pub fn is_match(&self) -> bool {
        matches!(self, Cell::Token(SpanTag::Match, _))
    }

    /// Whether this cell closes a line
    pub fn is_break(&self) -> bool {
        match self {
            Cell::Token(_, token) => is_break(token),
            Cell::Borrowed => true,
        }
    }
}

/// The rendered stream of one side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideStream {
    pub segments: Vec<Segment>,
}

impl SideStream {
    /// Append a tagged token, coalescing with a preceding span of the same tag
    pub fn push_token(&mut self, tag: SpanTag, token: &str) {
        if let Some(Segment::Span(last)) = self.segments.last_mut() {
            if last.tag == tag {
                last.tokens.push(token.to_string());
                return;
            }
        }
        self.segments.push(Segment::Span(Span::new(tag, token)));
    }

    pub fn push_borrowed(&mut self) {
        self.segments.push(Segment::Borrowed);
    }

    /// Spans in emission order, borrowed markers excluded
    #[cfg(test)]
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Span(span) => Some(span),
            Segment::Borrowed => None,
        })
    }

    /// The side's tokens as reproduced by its spans
    #[cfg(test)]
    pub fn tokens(&self) -> Vec<&str> {
        self.spans()
            .flat_map(|span| span.tokens.iter().map(String::as_str))
            .collect()
    }

    pub fn borrowed_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Borrowed))
            .count()
    }

    /// Flatten into per-token cells
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> {
        self.segments.iter().flat_map(|segment| {
            let cells: Vec<Cell<'_>> = match segment {
                Segment::Span(span) => span
                    .tokens
                    .iter()
                    .map(|token| Cell::Token(span.tag, token.as_str()))
                    .collect(),
                Segment::Borrowed => vec![Cell::Borrowed],
            };
            cells
        })
    }
}

/// How a line unit begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStart {
    /// Start of text or after a real break token
    #[default]
    Text,
    /// After a synthetic break that closed an empty line
    Filler,
    /// After a synthetic break that cut a non-empty line
    Borrowed,
}

/// How a line unit ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnd {
    /// End of text
    #[default]
    Open,
    /// A real break token with its tag
    Break(SpanTag),
    /// A borrowed or padding break
    Synthetic,
}

/// One side's content between two break markers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineUnit {
    pub spans: Vec<Span>,
    pub start: LineStart,
    pub end: LineEnd,
}

impl LineUnit {
    /// An empty padding line
    pub fn filler(end: LineEnd) -> Self {
        Self {
            spans: Vec::new(),
            start: LineStart::Filler,
            end,
        }
    }

    pub fn push(&mut self, tag: SpanTag, token: &str) {
        push_coalesced(&mut self.spans, tag, token);
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// An empty line that exists only to keep both sides level
    pub fn is_filler(&self) -> bool {
        self.is_empty() && (self.end == LineEnd::Synthetic || self.start != LineStart::Text)
    }

    pub fn has_changes(&self) -> bool {
        self.spans.iter().any(|span| span.tag.is_changed())
    }

    /// Whether the line carries any content present on both sides
    pub fn has_anchor(&self) -> bool {
        self.spans
            .iter()
            .any(|span| matches!(span.tag, SpanTag::Match | SpanTag::Neutral))
    }

    pub fn changed_spans(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|span| span.tag.is_changed())
    }
}

/// The left and right line units sharing one output row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePair {
    pub left: LineUnit,
    pub right: LineUnit,
}

/// Classification of a line pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Missing,
    Edited,
    Unchanged,
}

/// One classified row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReportEntry {
    /// 1-based row number
    pub line: usize,
    pub kind: ChangeKind,
    pub left: String,
    pub right: String,
}

/// Colors used by the renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Padding lines
    pub edited: String,
    pub inserted: String,
    pub deleted: String,
    /// Borrowed-line content
    pub neutral: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            edited: "#CB6D6D".to_string(),
            inserted: "#99FFCC".to_string(),
            deleted: "#CB6D6D".to_string(),
            neutral: "#ffffff".to_string(),
        }
    }
}

impl Theme {
    /// Background color for a tag, `None` for unstyled content
    pub fn color_for(&self, tag: SpanTag) -> Option<&str> {
        match tag {
            SpanTag::Match => None,
            SpanTag::Deleted => Some(&self.deleted),
            SpanTag::Inserted => Some(&self.inserted),
            SpanTag::Neutral => Some(&self.neutral),
        }
    }

    /// First color that cannot sit inside a `style` attribute, by role
    pub fn unsafe_color(&self) -> Option<(&'static str, &str)> {
        [
            ("deleted", &self.deleted),
            ("inserted", &self.inserted),
            ("edited", &self.edited),
            ("neutral", &self.neutral),
        ]
        .into_iter()
        .find(|(_, color)| {
            color
                .chars()
                .any(|c| matches!(c, '"' | '\'' | '<' | '>' | '&' | ';') || c.is_control())
        })
        .map(|(role, color)| (role, color.as_str()))
    }
}
