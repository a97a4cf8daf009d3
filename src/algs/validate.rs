//! Reference validator: the same stencil pass computed sequentially over a
//! pristine copy, and an exact elementwise comparison against the pipelined
//! result.
//!
//! The pass runs in place in row-major order, so each cell sees already
//! updated left and upper neighbours and pristine right and lower ones,
//! exactly as the pipelined ranks do.

use crate::algs::stencil::stencil_cell;
use crate::data::grid::Grid;
use crate::stencil_error::StencilError;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

/// First cell where the pipelined result disagrees with the reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: i32,
    pub actual: i32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grids differ at [{}][{}]: reference={}, pipelined={}",
            self.row, self.col, self.expected, self.actual
        )
    }
}

/// Sequential stencil pass over `pristine`. The input is not modified.
pub fn reference_pass(pristine: &Grid) -> Grid {
    let mut grid = pristine.clone();
    let rows = grid.rows();
    for r in 0..rows {
        for c in 0..grid.cols() {
            let next = (r + 1 < rows).then(|| grid.row(r + 1));
            let cell: Result<i32, Infallible> =
                stencil_cell(grid.row(r), next, r > 0, c, |cc| Ok(grid.get(r - 1, cc)));
            let value = match cell {
                Ok(v) => v,
                Err(never) => match never {},
            };
            grid.set(r, c, value);
        }
    }
    grid
}

/// First mismatch in row-major order, or `None` if the grids agree.
///
/// # Errors
/// [`StencilError::RaggedGrid`] if the grids differ in shape.
pub fn compare(reference: &Grid, actual: &Grid) -> Result<Option<Mismatch>, StencilError> {
    if reference.cols() != actual.cols() || reference.rows() != actual.rows() {
        return Err(StencilError::RaggedGrid {
            row: reference.rows().min(actual.rows()),
            expected: reference.cols(),
            got: actual.cols(),
        });
    }
    for (r, (want, got)) in reference.iter_rows().zip(actual.iter_rows()).enumerate() {
        if let Some(c) = want.iter().zip(got).position(|(a, b)| a != b) {
            return Ok(Some(Mismatch {
                row: r,
                col: c,
                expected: want[c],
                actual: got[c],
            }));
        }
    }
    Ok(None)
}

/// Recompute from `pristine` and compare with `actual`.
pub fn validate(pristine: &Grid, actual: &Grid) -> Result<Option<Mismatch>, StencilError> {
    compare(&reference_pass(pristine), actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_pass_is_in_place_row_major() {
        let g = Grid::from_rows(&[[0, 8], [8, 8]]).unwrap();
        let out = reference_pass(&g);
        // (0,0): right 8, below 8, below-right 8 -> 8
        // (0,1): left is the updated 8, below 8, below-left 8 -> 8
        assert_eq!(out.row(0), &[8, 8]);
        // (1,0): right 8, above 8, above-right 8 -> 8
        // (1,1): left 8, above 8, above-left 8 -> 8
        assert_eq!(out.row(1), &[8, 8]);
        assert_eq!(g.get(0, 0), 0);
    }

    #[test]
    fn compare_reports_first_difference() {
        let a = Grid::from_rows(&[[1, 2], [3, 4]]).unwrap();
        let mut b = a.clone();
        b.set(1, 0, 9);
        b.set(1, 1, 9);
        let m = compare(&a, &b).unwrap().unwrap();
        assert_eq!(
            m,
            Mismatch {
                row: 1,
                col: 0,
                expected: 3,
                actual: 9
            }
        );
        assert_eq!(compare(&a, &a).unwrap(), None);
    }

    #[test]
    fn shape_difference_is_an_error() {
        let a = Grid::zeros(2, 2);
        let b = Grid::zeros(2, 3);
        assert!(compare(&a, &b).is_err());
    }
}
