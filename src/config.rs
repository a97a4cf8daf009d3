//! Run configuration and the usage checks every rank performs before any
//! rows are distributed.

use crate::stencil_error::StencilError;
use serde::{Deserialize, Serialize};

/// Largest supported row count.
pub const MAX_ROWS: usize = 1000;
/// Largest supported column count.
pub const MAX_COLUMNS: usize = 1000;
/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x5EED_0001;

/// Parameters of a single pipelined pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub rows: usize,
    pub cols: usize,
    /// Seed for the coordinator's random grid.
    pub seed: u64,
    pub max_rows: usize,
    pub max_cols: usize,
}

impl RunConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            seed: DEFAULT_SEED,
            max_rows: MAX_ROWS,
            max_cols: MAX_COLUMNS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check bounds and the row/rank split for a group of `ranks` ranks.
    ///
    /// # Errors
    /// - [`StencilError::GridTooLarge`] if rows or columns exceed the limits.
    /// - [`StencilError::GridTooSmall`] if either dimension is below 2.
    /// - [`StencilError::IndivisibleRows`] if `rows % ranks != 0`.
    pub fn validate(&self, ranks: usize) -> Result<(), StencilError> {
        if self.rows > self.max_rows || self.cols > self.max_cols {
            return Err(StencilError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            });
        }
        if self.rows < 2 || self.cols < 2 {
            return Err(StencilError::GridTooSmall {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if ranks == 0 || self.rows % ranks != 0 {
            return Err(StencilError::IndivisibleRows {
                rows: self.rows,
                ranks,
            });
        }
        Ok(())
    }

    /// Rows each rank owns; only meaningful after [`validate`](Self::validate).
    pub fn rows_per_rank(&self, ranks: usize) -> usize {
        self.rows / ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_even_split() {
        assert!(RunConfig::new(8, 5).validate(4).is_ok());
        assert_eq!(RunConfig::new(8, 5).rows_per_rank(4), 2);
    }

    #[test]
    fn rejects_oversized_grid() {
        let err = RunConfig::new(1001, 10).validate(1).unwrap_err();
        assert!(matches!(err, StencilError::GridTooLarge { rows: 1001, .. }));
        let err = RunConfig::new(10, 1001).validate(1).unwrap_err();
        assert!(matches!(err, StencilError::GridTooLarge { cols: 1001, .. }));
    }

    #[test]
    fn rejects_indivisible_rows() {
        let err = RunConfig::new(10, 10).validate(3).unwrap_err();
        assert!(matches!(
            err,
            StencilError::IndivisibleRows { rows: 10, ranks: 3 }
        ));
    }

    #[test]
    fn rejects_degenerate_grid() {
        assert!(matches!(
            RunConfig::new(1, 1).validate(1),
            Err(StencilError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_keeps_seed() {
        let cfg = RunConfig::new(4, 4).with_seed(99);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
