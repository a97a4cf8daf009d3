//! Row distribution: the coordinator hands every worker its rows, workers
//! rebuild them as [`RowTask`]s.
//!
//! Per worker, in order: `(RowCount, 0, 0)` with the number of rows, then
//! for each slot `(RowIndex, slot, 0)` with the global row,
//! `(CurrentRow, row, 0)` with its values and, unless it is the grid's last
//! row, `(NextRow, row, 0)` with the row below.

use crate::COORDINATOR;
use crate::algs::communicator::Communicator;
use crate::algs::exchange::{recv_count, recv_values, send_count, send_values};
use crate::algs::tag::{MessageKind, encode};
use crate::data::grid::Grid;
use crate::data::row_task::RowTask;
use crate::stencil_error::StencilError;
use crate::topology::context::ProcessContext;
use log::{debug, info};

/// Task for global row `row`, copying the row and the pristine row below.
pub fn task_from_grid(grid: &Grid, row: usize) -> RowTask {
    let next = (row + 1 < grid.rows()).then(|| grid.row(row + 1).to_vec());
    RowTask::new(row, grid.row(row).to_vec(), next)
}

/// The coordinator's own rows, taken before any computation starts.
pub fn local_tasks(ctx: &ProcessContext, grid: &Grid) -> Vec<RowTask> {
    ctx.owned_rows().map(|row| task_from_grid(grid, row)).collect()
}

/// Send every worker its row count and rows.
pub fn distribute_rows<C: Communicator>(
    comm: &C,
    ctx: &ProcessContext,
    grid: &Grid,
) -> Result<(), StencilError> {
    let topo = ctx.topology();
    for worker in (0..ctx.ranks).filter(|&k| k != COORDINATOR) {
        send_count(
            comm,
            worker,
            encode(MessageKind::RowCount, 0, 0)?,
            topo.lines_per_rank(),
        );
        for (slot, row) in topo.rows_of(worker).enumerate() {
            info!("[rank {}] sending row {row} to rank {worker}", ctx.rank);
            send_count(comm, worker, encode(MessageKind::RowIndex, slot, 0)?, row);
            send_values(
                comm,
                worker,
                encode(MessageKind::CurrentRow, row, 0)?,
                grid.row(row),
            );
            if row + 1 < grid.rows() {
                send_values(
                    comm,
                    worker,
                    encode(MessageKind::NextRow, row, 0)?,
                    grid.row(row + 1),
                );
            }
        }
    }
    Ok(())
}

/// Worker side of [`distribute_rows`].
pub fn receive_assignment<C: Communicator>(
    comm: &C,
    ctx: &ProcessContext,
) -> Result<Vec<RowTask>, StencilError> {
    let count = recv_count(comm, COORDINATOR, encode(MessageKind::RowCount, 0, 0)?)?;
    info!("[rank {}] assigned {count} rows", ctx.rank);
    if count != ctx.rows_per_rank {
        return Err(StencilError::AssignmentMismatch {
            rank: ctx.rank,
            expected: ctx.rows_per_rank,
            got: count,
        });
    }

    let mut tasks = Vec::with_capacity(count);
    for slot in 0..count {
        let row = recv_count(comm, COORDINATOR, encode(MessageKind::RowIndex, slot, 0)?)?;
        let current = recv_values(
            comm,
            COORDINATOR,
            encode(MessageKind::CurrentRow, row, 0)?,
            ctx.cols,
        )?;
        let next = if row + 1 < ctx.rows {
            Some(recv_values(
                comm,
                COORDINATOR,
                encode(MessageKind::NextRow, row, 0)?,
                ctx.cols,
            )?)
        } else {
            None
        };
        debug!("[rank {}] received row {row} (slot {slot})", ctx.rank);
        tasks.push(RowTask::new(row, current, next));
    }
    Ok(tasks)
}
