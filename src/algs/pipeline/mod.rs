//! Pipeline orchestrator: coordinator and worker control loops.
//!
//! Every rank computes its rows in slot order, column by column. Each
//! finished element is forwarded at once to the ring successor as
//! `(ElementDone, row, col)`, so the owner of the next row can start before
//! this row is complete. Workers report each finished row to the
//! coordinator as `(RowDone, row, 0)`; the coordinator merges those into the
//! grid, one band of `P - 1` rows after each of its own rows.

pub mod coordinator;
pub mod distribute;
pub mod worker;

pub use coordinator::{RowState, RunReport, run_coordinator};
pub use worker::run_worker;

use crate::algs::communicator::Communicator;
use crate::algs::exchange::send_value;
use crate::algs::stencil::compute_cell;
use crate::algs::tag::{MessageKind, encode};
use crate::data::row_task::RowTask;
use crate::debug_invariants::DebugInvariants;
use crate::stencil_error::StencilError;
use crate::topology::context::ProcessContext;
use log::{debug, info};

/// Compute every column of `task` left to right, in place, forwarding each
/// value to the ring successor as soon as it is produced.
///
/// Nothing is forwarded for the grid's last row (no row below consumes it)
/// or when the successor is this rank.
pub fn process_row<C: Communicator>(
    comm: &C,
    ctx: &ProcessContext,
    task: &mut RowTask,
) -> Result<(), StencilError> {
    task.debug_assert_invariants();
    let pred = ctx.predecessor();
    let succ = ctx.successor();
    let forward = succ != ctx.rank && task.index + 1 < ctx.rows;

    for col in 0..task.cols() {
        let value = compute_cell(task, comm, pred, col)?;
        task.current[col] = value;
        if forward {
            let tag = encode(MessageKind::ElementDone, task.index, col)?;
            debug!(
                "[rank {}] finished M[{}][{col}]={value}, forwarding to rank {succ}",
                ctx.rank, task.index
            );
            send_value(comm, succ, tag, value);
        }
    }

    info!("[rank {}] finished row {}", ctx.rank, task.index);
    Ok(())
}
