//! Segment renderer
//!
//! Walks both token sequences against the common subsequence with a
//! three-state machine:
//!
//! - `Match`: both sides sit on the common token, emit it on both and advance
//! - `LeftSkip`: emit the left token as deleted and advance left
//! - `RightSkip`: emit the right token as inserted and advance right
//!
//! When only one side has to skip to reach the next common token, every
//! break it skips is mirrored by a borrowed break on the other side. When
//! both sides skip, nothing is mirrored; the reconciler levels that block.

use tracing::debug;

use crate::core::error::DiffError;
use crate::core::model::{is_break, Side, SideStream, SpanTag};

/// One transition of the alignment walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Match,
    LeftSkip,
    RightSkip,
}

impl Step {
    /// Left skips run before right skips when both sides are off the token
    fn next(left_at: bool, right_at: bool) -> Self {
        match (left_at, right_at) {
            (true, true) => Step::Match,
            (false, _) => Step::LeftSkip,
            (true, false) => Step::RightSkip,
        }
    }
}

/// The tagged streams of both sides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendering {
    pub left: SideStream,
    pub right: SideStream,
}

/// Walk state: read positions on both sides plus the streams built so far
struct Walker<'a, T> {
    left: &'a [T],
    right: &'a [T],
    i: usize,
    j: usize,
    out: Rendering,
}

impl<'a, T: AsRef<str>> Walker<'a, T> {
    fn at(tokens: &[T], pos: usize, token: &str) -> bool {
        tokens.get(pos).is_some_and(|t| t.as_ref() == token)
    }

    /// Advance both sides up to and including the common token
    fn align_to(&mut self, index: usize, token: &str) -> Result<(), DiffError> {
        let mirror = Self::at(self.left, self.i, token) != Self::at(self.right, self.j, token);

        loop {
            let step = Step::next(
                Self::at(self.left, self.i, token),
                Self::at(self.right, self.j, token),
            );
            match step {
                Step::Match => {
                    self.out.left.push_token(SpanTag::Match, token);
                    self.out.right.push_token(SpanTag::Match, token);
                    self.i += 1;
                    self.j += 1;
                    return Ok(());
                }
                Step::LeftSkip => {
                    let skipped = self.left.get(self.i).ok_or_else(|| {
                        DiffError::MissingCommonToken {
                            side: Side::Left,
                            index,
                            token: token.to_string(),
                        }
                    })?;
                    self.skip_left(skipped.as_ref(), mirror);
                }
                Step::RightSkip => {
                    let skipped = self.right.get(self.j).ok_or_else(|| {
                        DiffError::MissingCommonToken {
                            side: Side::Right,
                            index,
                            token: token.to_string(),
                        }
                    })?;
                    self.skip_right(skipped.as_ref(), mirror);
                }
            }
        }
    }

    fn skip_left(&mut self, token: &str, mirror: bool) {
        self.out.left.push_token(SpanTag::Deleted, token);
        if mirror && is_break(token) {
            self.out.right.push_borrowed();
        }
        self.i += 1;
    }

    fn skip_right(&mut self, token: &str, mirror: bool) {
        self.out.right.push_token(SpanTag::Inserted, token);
        if mirror && is_break(token) {
            self.out.left.push_borrowed();
        }
        self.j += 1;
    }

    /// Emit whatever follows the last common token, left first
    fn drain_tails(&mut self) {
        let (left, right) = (self.left, self.right);
        for token in &left[self.i..] {
            self.skip_left(token.as_ref(), true);
        }
        for token in &right[self.j..] {
            self.skip_right(token.as_ref(), true);
        }
    }
}

/// Render both sides against their common subsequence
pub fn render_segments<T: AsRef<str>>(
    left: &[T],
    right: &[T],
    common: &[String],
) -> Result<Rendering, DiffError> {
    let mut walker = Walker {
        left,
        right,
        i: 0,
        j: 0,
        out: Rendering::default(),
    };

    for (index, token) in common.iter().enumerate() {
        walker.align_to(index, token)?;
    }
    walker.drain_tails();

    debug!(
        left_borrowed = walker.out.left.borrowed_count(),
        right_borrowed = walker.out.right.borrowed_count(),
        "rendered segments"
    );
    Ok(walker.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::core::lcs::common_subsequence;
    use crate::core::model::{Segment, Span, BREAK_MARKER};
    use crate::core::normalize::{normalize, tokenize};

    fn render(old: &str, new: &str) -> Rendering {
        let left = tokenize(&normalize(old));
        let right = tokenize(&normalize(new));
        let common = common_subsequence(&left, &right, None).unwrap();
        render_segments(&left, &right, &common).unwrap()
    }

    fn span(tag: SpanTag, tokens: &[&str]) -> Segment {
        Segment::Span(Span {
            tag,
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        })
    }

    #[test]
    fn test_step_transitions() {
        assert_eq!(Step::next(true, true), Step::Match);
        assert_eq!(Step::next(false, true), Step::LeftSkip);
        assert_eq!(Step::next(false, false), Step::LeftSkip);
        assert_eq!(Step::next(true, false), Step::RightSkip);
    }

    #[test]
    fn test_substitution_spans() {
        let out = render("A B C", "A X C");
        assert_eq!(
            out.left.segments,
            vec![
                span(SpanTag::Match, &["A"]),
                span(SpanTag::Deleted, &["B"]),
                span(SpanTag::Match, &["C"]),
            ]
        );
        assert_eq!(
            out.right.segments,
            vec![
                span(SpanTag::Match, &["A"]),
                span(SpanTag::Inserted, &["X"]),
                span(SpanTag::Match, &["C"]),
            ]
        );
    }

    #[test]
    fn test_one_sided_break_is_mirrored() {
        let out = render("A\nB\nC", "A\nC");
        assert_eq!(
            out.left.segments,
            vec![
                span(SpanTag::Match, &["A", BREAK_MARKER]),
                span(SpanTag::Deleted, &["B", BREAK_MARKER]),
                span(SpanTag::Match, &["C"]),
            ]
        );
        assert_eq!(
            out.right.segments,
            vec![
                span(SpanTag::Match, &["A", BREAK_MARKER]),
                Segment::Borrowed,
                span(SpanTag::Match, &["C"]),
            ]
        );
    }

    #[test]
    fn test_two_sided_block_is_not_mirrored() {
        let out = render("A B\nC D", "A X D");
        assert_eq!(out.left.borrowed_count(), 0);
        assert_eq!(out.right.borrowed_count(), 0);
        assert_eq!(out.left.tokens(), vec!["A", "B", BREAK_MARKER, "C", "D"]);
        assert_eq!(out.right.tokens(), vec!["A", "X", "D"]);
    }

    #[test]
    fn test_tails_are_mirrored() {
        let out = render("A\nB", "A");
        assert_eq!(out.right.borrowed_count(), 1);
        assert_eq!(out.left.borrowed_count(), 0);

        let out = render("A", "A\nB\nC");
        assert_eq!(out.left.borrowed_count(), 2);
    }

    #[test]
    fn test_missing_common_token_fails_fast() {
        let left = vec!["A".to_string()];
        let right = vec!["A".to_string()];
        let common = vec!["Z".to_string()];
        let err = render_segments(&left, &right, &common).unwrap_err();
        assert!(matches!(
            err,
            DiffError::MissingCommonToken {
                side: Side::Left,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_spans_cover_each_side() {
        let old = "one two\nthree four five\nsix";
        let new = "one 2\nthree five\nsix seven\neight";
        let out = render(old, new);
        assert_eq!(out.left.tokens(), tokenize(&normalize(old)));
        assert_eq!(out.right.tokens(), tokenize(&normalize(new)));
    }

    fn side_strategy() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(prop::sample::select(vec!["x", "y", "z", BREAK_MARKER]), 0..14)
    }

    proptest! {
        #[test]
        fn prop_spans_reproduce_tokens(left in side_strategy(), right in side_strategy()) {
            let common = common_subsequence(&left, &right, None).unwrap();
            let out = render_segments(&left, &right, &common).unwrap();
            prop_assert_eq!(out.left.tokens(), left);
            prop_assert_eq!(out.right.tokens(), right);
        }
    }
}
