//! Line reconciler
//!
//! Regroups both rendered streams into line units so that row `n` on the
//! left faces row `n` on the right.
//!
//! The streams are consumed in lockstep, one block at a time. A block is the
//! run of deleted/inserted/borrowed cells in front of the next matched token,
//! which is the same token on both sides. Within a block the side holding
//! fewer break markers is padded with synthetic breaks after its own content,
//! so both sides close the same number of lines before the next match.
//!
//! Two passes then run over the rows:
//!
//! 1. lines that start after a synthetic break which cut a non-empty line are
//!    continuations of that line; their matched spans turn neutral
//! 2. when the two sides share no token at all, rows where both sides hold
//!    changed content are split into a left-only row and a right-only row

use std::iter::Peekable;
use tracing::debug;

use crate::core::error::DiffError;
use crate::core::model::{Cell, LineEnd, LinePair, LineStart, LineUnit, SpanTag};
use crate::core::segment::Rendering;

/// Builds the line units of one side
#[derive(Debug, Default)]
struct LineAccumulator {
    lines: Vec<LineUnit>,
    current: LineUnit,
}

impl LineAccumulator {
    fn push(&mut self, cell: Cell<'_>) {
        match cell {
            Cell::Token(tag, _) if cell.is_break() => self.close(LineEnd::Break(tag)),
            Cell::Token(tag, token) => self.current.push(tag, token),
            Cell::Borrowed => self.close(LineEnd::Synthetic),
        }
    }

    fn pad(&mut self, count: usize) {
        for _ in 0..count {
            self.close(LineEnd::Synthetic);
        }
    }

    fn close(&mut self, end: LineEnd) {
        let mut line = std::mem::take(&mut self.current);
        line.end = end;

        self.current.start = match end {
            LineEnd::Synthetic if !line.is_empty() => LineStart::Borrowed,
            // Filler lines keep carrying the cut of the line above them
            LineEnd::Synthetic if line.start == LineStart::Borrowed => LineStart::Borrowed,
            LineEnd::Synthetic => LineStart::Filler,
            LineEnd::Break(_) | LineEnd::Open => LineStart::Text,
        };
        self.lines.push(line);
    }

    fn finish(mut self) -> Vec<LineUnit> {
        self.lines.push(self.current);
        self.lines
    }
}

/// Take the cells in front of the next matched token
fn take_block<'a, I>(cells: &mut Peekable<I>) -> Vec<Cell<'a>>
where
    I: Iterator<Item = Cell<'a>>,
{
    let mut block = Vec::new();
    while let Some(cell) = cells.next_if(|cell| !cell.is_match()) {
        block.push(cell);
    }
    block
}

fn count_breaks(block: &[Cell<'_>]) -> usize {
    block.iter().filter(|cell| cell.is_break()).count()
}

/// Group both rendered streams into rows of equal count
///
/// `disjoint` marks inputs without a common token; only then are replacement
/// rows split apart.
pub fn reconcile(rendering: &Rendering, disjoint: bool) -> Result<Vec<LinePair>, DiffError> {
    let mut left_cells = rendering.left.cells().peekable();
    let mut right_cells = rendering.right.cells().peekable();
    let mut left = LineAccumulator::default();
    let mut right = LineAccumulator::default();

    loop {
        let left_block = take_block(&mut left_cells);
        let right_block = take_block(&mut right_cells);
        let (left_breaks, right_breaks) = (count_breaks(&left_block), count_breaks(&right_block));

        left_block.into_iter().for_each(|cell| left.push(cell));
        right_block.into_iter().for_each(|cell| right.push(cell));

        if left_breaks < right_breaks {
            left.pad(right_breaks - left_breaks);
        } else {
            right.pad(left_breaks - right_breaks);
        }

        match (left_cells.next(), right_cells.next()) {
            (None, None) => break,
            (Some(Cell::Token(SpanTag::Match, a)), Some(Cell::Token(SpanTag::Match, b)))
                if a == b =>
            {
                left.push(Cell::Token(SpanTag::Match, a));
                right.push(Cell::Token(SpanTag::Match, b));
            }
            (l, r) => {
                return Err(DiffError::Desync(format!(
                    "matched tokens disagree: left {:?}, right {:?}",
                    l, r
                )))
            }
        }
    }

    let left_lines = left.finish();
    let right_lines = right.finish();
    if left_lines.len() != right_lines.len() {
        return Err(DiffError::Desync(format!(
            "{} left lines against {} right lines",
            left_lines.len(),
            right_lines.len()
        )));
    }

    let mut rows: Vec<LinePair> = left_lines
        .into_iter()
        .zip(right_lines)
        .map(|(left, right)| LinePair { left, right })
        .collect();

    neutralize_borrowed(&mut rows);
    let rows = if disjoint {
        split_replacements(rows)
    } else {
        rows
    };
    debug!(rows = rows.len(), "reconciled line units");
    Ok(rows)
}

/// Restyle the matched content of continuation lines
fn neutralize_borrowed(rows: &mut [LinePair]) {
    for row in rows.iter_mut() {
        for line in [&mut row.left, &mut row.right] {
            if line.start != LineStart::Borrowed {
                continue;
            }
            for span in line.spans.iter_mut().filter(|span| span.tag == SpanTag::Match) {
                span.tag = SpanTag::Neutral;
            }
        }
    }
}

/// A line made only of deleted or inserted content
fn is_replacement(line: &LineUnit) -> bool {
    line.has_changes() && !line.has_anchor()
}

/// Report wholesale replacements as a removal followed by an addition
fn split_replacements(rows: Vec<LinePair>) -> Vec<LinePair> {
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        if !(is_replacement(&row.left) && is_replacement(&row.right)) {
            out.push(row);
            continue;
        }

        let LinePair { mut left, right } = row;
        // The removal row now sits above another line, so an open left end
        // moves down to the filler below it.
        let left_tail = match left.end {
            LineEnd::Open => {
                left.end = LineEnd::Synthetic;
                LineEnd::Open
            }
            _ => LineEnd::Synthetic,
        };

        out.push(LinePair {
            left,
            right: LineUnit::filler(LineEnd::Synthetic),
        });
        out.push(LinePair {
            left: LineUnit::filler(left_tail),
            right,
        });
    }

    out
}
