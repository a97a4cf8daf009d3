//! Round-robin row striping over a ring of ranks.
//!
//! Row `r` belongs to rank `r % P` at local slot `r / P`. Adjacent rows are
//! therefore always exactly one ring step apart in ownership: the row above
//! any row owned by rank `k` is owned by `pred(k)`. Ownership is a pure
//! function of `(rank, slot)`, so no explicit wait-for graph is kept.

use crate::stencil_error::StencilError;
use serde::{Deserialize, Serialize};

/// Row ownership map for `rows` rows over `ranks` ranks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTopology {
    rows: usize,
    ranks: usize,
}

impl RowTopology {
    /// # Errors
    /// Returns [`StencilError::IndivisibleRows`] unless `rows % ranks == 0`.
    pub fn new(rows: usize, ranks: usize) -> Result<Self, StencilError> {
        if ranks == 0 || rows % ranks != 0 {
            return Err(StencilError::IndivisibleRows { rows, ranks });
        }
        Ok(Self { rows, ranks })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn ranks(&self) -> usize {
        self.ranks
    }

    /// Rows owned by every rank.
    pub fn lines_per_rank(&self) -> usize {
        self.rows / self.ranks
    }

    /// Global index of `slot` on `rank`: `rank + slot * P`.
    #[inline]
    pub fn global_row(&self, rank: usize, slot: usize) -> usize {
        rank + slot * self.ranks
    }

    /// `(owner rank, local slot)` of a global row.
    #[inline]
    pub fn owner(&self, row: usize) -> (usize, usize) {
        (row % self.ranks, row / self.ranks)
    }

    /// Ring predecessor; rank 0 wraps to `P - 1`.
    #[inline]
    pub fn predecessor(&self, rank: usize) -> usize {
        (rank + self.ranks - 1) % self.ranks
    }

    /// Ring successor; `P - 1` wraps to rank 0.
    #[inline]
    pub fn successor(&self, rank: usize) -> usize {
        (rank + 1) % self.ranks
    }

    /// Global rows of `rank` in slot order.
    pub fn rows_of(&self, rank: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.lines_per_rank()).map(move |slot| self.global_row(rank, slot))
    }

    /// Check that `rank` names a member of the ring.
    pub fn check_rank(&self, rank: usize) -> Result<(), StencilError> {
        if rank < self.ranks {
            Ok(())
        } else {
            Err(StencilError::RankOutOfRange {
                rank,
                size: self.ranks,
            })
        }
    }
}
