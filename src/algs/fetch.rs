//! Fetch of "row above" values from the ring predecessor, deduplicated
//! through the row's [`DependencyCache`].

use crate::algs::communicator::Communicator;
use crate::algs::exchange::recv_value;
use crate::algs::tag::{MessageKind, encode};
use crate::data::row_task::{DependencyCache, RowTask};
use crate::stencil_error::StencilError;
use log::debug;

/// Value at `(row - 1, col)`.
///
/// Served from `cache` when already received; otherwise blocks for the
/// `(ElementDone, row - 1, col)` message from `pred`, caches it and returns
/// it. At most one receive is issued per `(row, col)`.
pub fn fetch_into<C: Communicator>(
    cache: &mut DependencyCache,
    row: usize,
    comm: &C,
    pred: usize,
    col: usize,
) -> Result<i32, StencilError> {
    if col >= cache.len() {
        return Err(StencilError::ColumnOutOfRange {
            col,
            cols: cache.len(),
        });
    }
    if let Some(v) = cache.get(col) {
        return Ok(v);
    }
    let above = row.checked_sub(1).ok_or(StencilError::NoRowAbove { row })?;
    let tag = encode(MessageKind::ElementDone, above, col)?;
    debug!(
        "[rank {}] waiting for M[{above}][{col}] from rank {pred} (tag={tag:#x})",
        comm.rank()
    );
    let value = recv_value(comm, pred, tag)?;
    debug!(
        "[rank {}] received M[{above}][{col}]={value} from rank {pred}",
        comm.rank()
    );
    Ok(cache.store(col, value))
}

/// [`fetch_into`] against a whole task.
pub fn fetch<C: Communicator>(
    task: &mut RowTask,
    comm: &C,
    pred: usize,
    col: usize,
) -> Result<i32, StencilError> {
    fetch_into(&mut task.above, task.index, comm, pred, col)
}
