//! Engine errors

use crate::core::model::Side;

/// Failures of a single comparison
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("{side} side has {count} tokens, above the limit of {limit}")]
    TooManyTokens {
        side: Side,
        count: usize,
        limit: usize,
    },

    #[error("alignment table of {cells} cells exceeds the limit of {limit}")]
    TableTooLarge { cells: usize, limit: usize },

    /// The common subsequence names a token the side does not contain at the
    /// expected position, which means the two sides were normalized differently.
    #[error("common token #{index} {token:?} not found on the {side} side")]
    MissingCommonToken {
        side: Side,
        index: usize,
        token: String,
    },

    #[error("line reconciliation lost sync: {0}")]
    Desync(String),
}
