//! The comparison pipeline
//!
//! normalize -> tokenize -> align -> render segments -> reconcile lines.
//! The result is structured rows; turning them into HTML or a report is the
//! job of the renderers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::DiffError;
use crate::core::lcs::common_subsequence;
use crate::core::model::LinePair;
use crate::core::normalize::{fold_open_tags, normalize, tokenize};
use crate::core::reconcile::reconcile;
use crate::core::segment::render_segments;

/// Options for one comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Fold multi-line opening tags before normalizing (HTML view only)
    pub fold_tags: bool,

    /// Refuse inputs with more tokens than this on either side
    pub max_tokens: Option<usize>,
}

/// Rows of one compared file pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub name: String,
    pub rows: Vec<LinePair>,
}

fn prepare(text: &str, options: &CompareOptions) -> Vec<String> {
    if options.fold_tags {
        tokenize(&normalize(&fold_open_tags(text)))
    } else {
        tokenize(&normalize(text))
    }
}

/// Compare two texts
pub fn compare_texts(
    old: &str,
    new: &str,
    name: &str,
    options: &CompareOptions,
) -> Result<Comparison, DiffError> {
    let left = prepare(old, options);
    let right = prepare(new, options);
    debug!(
        file = name,
        left_tokens = left.len(),
        right_tokens = right.len(),
        "tokenized"
    );

    let common = common_subsequence(&left, &right, options.max_tokens)?;
    let rendering = render_segments(&left, &right, &common)?;
    let rows = reconcile(&rendering, common.is_empty())?;

    Ok(Comparison {
        name: name.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::html::render_side_by_side;
    use crate::core::model::{ChangeKind, LineEnd, Theme};
    use crate::core::report::entries;
    use proptest::prelude::*;

    #[test]
    fn test_row_count_matches_on_both_sides() {
        let cmp = compare_texts(
            "<a>\n<b>1</b>\n</a>",
            "<a>\n<b>2</b>\n<c/>\n</a>",
            "x.xml",
            &CompareOptions::default(),
        )
        .unwrap();
        assert_eq!(cmp.name, "x.xml");
        assert!(!cmp.rows.is_empty());
    }

    #[test]
    fn test_fold_changes_line_structure() {
        let old = "<item\nid=\"1\">";
        let plain = compare_texts(old, old, "f", &CompareOptions::default()).unwrap();
        let folded = compare_texts(
            old,
            old,
            "f",
            &CompareOptions {
                fold_tags: true,
                ..CompareOptions::default()
            },
        )
        .unwrap();
        assert_eq!(plain.rows.len(), 2);
        assert_eq!(folded.rows.len(), 1);
    }

    #[test]
    fn test_token_limit_is_enforced() {
        let err = compare_texts(
            "a b c d",
            "a",
            "f",
            &CompareOptions {
                max_tokens: Some(3),
                ..CompareOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::TooManyTokens { .. }));
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        "[ab<>& \n]{0,24}"
    }

    proptest! {
        #[test]
        fn prop_rows_close_in_lockstep(old in text_strategy(), new in text_strategy()) {
            let cmp = compare_texts(&old, &new, "p", &CompareOptions::default()).unwrap();
            let (last, body) = cmp.rows.split_last().unwrap();
            prop_assert_eq!(last.left.end, LineEnd::Open);
            prop_assert_eq!(last.right.end, LineEnd::Open);
            for row in body {
                prop_assert_ne!(row.left.end, LineEnd::Open);
                prop_assert_ne!(row.right.end, LineEnd::Open);
            }

            let html = render_side_by_side(&cmp.rows, &Theme::default());
            let (left_col, right_col) = html.split_at(html.find("</div>").unwrap());
            prop_assert_eq!(left_col.matches("<br>").count(), right_col.matches("<br>").count());
        }

        #[test]
        fn prop_text_against_itself_is_unchanged(text in text_strategy()) {
            let cmp = compare_texts(&text, &text, "p", &CompareOptions::default()).unwrap();
            let kinds: Vec<ChangeKind> = entries(&cmp.rows, &Theme::default())
                .into_iter()
                .map(|entry| entry.kind)
                .collect();
            prop_assert!(kinds.iter().all(|kind| *kind == ChangeKind::Unchanged));
        }

        #[test]
        fn prop_rediff_is_deterministic(old in text_strategy(), new in text_strategy()) {
            let first = compare_texts(&old, &new, "p", &CompareOptions::default()).unwrap();
            let second = compare_texts(&old, &new, "p", &CompareOptions::default()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
