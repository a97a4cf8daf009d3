//! Dense row-major integer grid owned by the coordinator.

use crate::debug_invariants::DebugInvariants;
use crate::stencil_error::StencilError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `rows x cols` integers stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl Grid {
    /// Zero-filled grid.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Grid of uniformly random digits `0..10`, reproducible from `seed`.
    pub fn random(rows: usize, cols: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let data = (0..rows * cols).map(|_| rng.gen_range(0..10)).collect();
        Self { rows, cols, data }
    }

    /// Build from nested rows.
    ///
    /// # Errors
    /// Returns [`StencilError::RaggedGrid`] if the rows differ in length.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, StencilError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != cols {
                return Err(StencilError::RaggedGrid {
                    row: i,
                    expected: cols,
                    got: r.len(),
                });
            }
            data.extend_from_slice(r);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [i32] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Overwrite `row` with `values`.
    ///
    /// # Errors
    /// Returns [`StencilError::RaggedGrid`] if `values` is not `cols` long.
    pub fn set_row(&mut self, row: usize, values: &[i32]) -> Result<(), StencilError> {
        if values.len() != self.cols {
            return Err(StencilError::RaggedGrid {
                row,
                expected: self.cols,
                got: values.len(),
            });
        }
        self.row_mut(row).copy_from_slice(values);
        Ok(())
    }

    /// Iterate rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[i32]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }
}

impl DebugInvariants for Grid {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Grid");
    }

    fn validate_invariants(&self) -> Result<(), StencilError> {
        if self.data.len() != self.rows * self.cols {
            return Err(StencilError::GridShape {
                rows: self.rows,
                cols: self.cols,
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            write!(f, "[ ")?;
            for v in row {
                write!(f, "{v} ")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
