//! Stencil kernel: one output cell from its existing up-to-8 neighbours.
//!
//! Neighbour set, for column `c` of row `r`:
//! - left/right in the current row,
//! - below-left, below, below-right from the row below (if any),
//! - above-left, above, above-right from the row above (if any),
//!
//! truncated at the grid edges. Corners see 3 neighbours, edges 5, interior 8.
//! The result is the floor of the real-valued mean.

use crate::algs::communicator::Communicator;
use crate::algs::fetch::fetch_into;
use crate::data::row_task::RowTask;
use crate::stencil_error::StencilError;

/// `floor(sum / count)` using real division, so negative sums round down.
#[inline]
pub fn floor_average(sum: i64, count: u32) -> i32 {
    (sum as f64 / f64::from(count)).floor() as i32
}

/// Average the neighbours of `current[col]`.
///
/// `above` resolves a column of the row above and is only called when
/// `has_above` is set, in the order left, centre, right. Every caller (the
/// pipeline and the reference validator) goes through this one function, so
/// both see the same neighbour set.
pub fn stencil_cell<E, F>(
    current: &[i32],
    next: Option<&[i32]>,
    has_above: bool,
    col: usize,
    mut above: F,
) -> Result<i32, E>
where
    F: FnMut(usize) -> Result<i32, E>,
{
    let cols = current.len();
    let has_left = col > 0;
    let has_right = col + 1 < cols;

    let mut sum: i64 = 0;
    let mut count: u32 = 0;

    if has_right {
        sum += i64::from(current[col + 1]);
        count += 1;
    }
    if has_left {
        sum += i64::from(current[col - 1]);
        count += 1;
    }

    if let Some(next) = next {
        sum += i64::from(next[col]);
        count += 1;
        if has_right {
            sum += i64::from(next[col + 1]);
            count += 1;
        }
        if has_left {
            sum += i64::from(next[col - 1]);
            count += 1;
        }
    }

    if has_above {
        if has_left {
            sum += i64::from(above(col - 1)?);
            count += 1;
        }
        sum += i64::from(above(col)?);
        count += 1;
        if has_right {
            sum += i64::from(above(col + 1)?);
            count += 1;
        }
    }

    // Only a 1x1 grid has no neighbours; configuration rejects it.
    if count == 0 {
        return Ok(current[col]);
    }
    Ok(floor_average(sum, count))
}

/// Compute column `col` of `task`, pulling the row above from `pred`
/// through the task's dependency cache.
pub fn compute_cell<C: Communicator>(
    task: &mut RowTask,
    comm: &C,
    pred: usize,
    col: usize,
) -> Result<i32, StencilError> {
    let RowTask {
        index,
        current,
        next,
        above,
    } = task;
    let row = *index;
    stencil_cell(&current[..], next.as_deref(), row > 0, col, |c| {
        fetch_into(above, row, comm, pred, c)
    })
}
