//! Longest common subsequence over token sequences
//!
//! The table holds suffix LCS lengths: `table[i][j]` is the LCS length of
//! `left[i..]` and `right[j..]`. Reconstruction walks forward from `(0, 0)`
//! and, when the forward values tie, advances the left index. That tie-break
//! decides which of several equally long subsequences is returned, so it
//! fixes which tokens render as matched.

use tracing::debug;

use crate::core::error::DiffError;
use crate::core::model::Side;

/// Largest table `common_subsequence` will allocate (512 MB of `u32` cells)
pub const MAX_TABLE_CELLS: usize = 1 << 27;

/// Suffix LCS length table, stored row-major
#[derive(Debug, Clone)]
pub struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    /// Fill the `(m+1) x (n+1)` table from the bottom-right corner
    pub fn build<T: AsRef<str>>(left: &[T], right: &[T]) -> Self {
        let (m, n) = (left.len(), right.len());
        let cols = n + 1;
        let mut cells = vec![0u32; (m + 1) * cols];

        for i in (0..m).rev() {
            for j in (0..n).rev() {
                cells[i * cols + j] = if left[i].as_ref() == right[j].as_ref() {
                    cells[(i + 1) * cols + j + 1] + 1
                } else {
                    cells[(i + 1) * cols + j].max(cells[i * cols + j + 1])
                };
            }
        }

        Self { cols, cells }
    }

    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j] as usize
    }

    /// Length of the full LCS
    pub fn lcs_len(&self) -> usize {
        self.get(0, 0)
    }

    /// Walk the table forward and collect one maximum common subsequence
    pub fn walk<T: AsRef<str>>(&self, left: &[T], right: &[T]) -> Vec<String> {
        let (mut i, mut j) = (0, 0);
        let mut common = Vec::with_capacity(self.lcs_len());

        while i < left.len() && j < right.len() {
            if left[i].as_ref() == right[j].as_ref() {
                common.push(right[j].as_ref().to_string());
                i += 1;
                j += 1;
            } else if self.get(i + 1, j) >= self.get(i, j + 1) {
                i += 1;
            } else {
                j += 1;
            }
        }

        common
    }
}

/// Compute the common subsequence, refusing inputs above `max_tokens`
pub fn common_subsequence<T: AsRef<str>>(
    left: &[T],
    right: &[T],
    max_tokens: Option<usize>,
) -> Result<Vec<String>, DiffError> {
    if let Some(limit) = max_tokens {
        for (side, count) in [(Side::Left, left.len()), (Side::Right, right.len())] {
            if count > limit {
                return Err(DiffError::TooManyTokens { side, count, limit });
            }
        }
    }

    let cells = (left.len() + 1)
        .checked_mul(right.len() + 1)
        .unwrap_or(usize::MAX);
    if cells > MAX_TABLE_CELLS {
        return Err(DiffError::TableTooLarge {
            cells,
            limit: MAX_TABLE_CELLS,
        });
    }

    let table = LcsTable::build(left, right);
    let common = table.walk(left, right);
    debug!(
        left = left.len(),
        right = right.len(),
        common = common.len(),
        "aligned token sequences"
    );
    Ok(common)
}
