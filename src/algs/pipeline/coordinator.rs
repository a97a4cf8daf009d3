//! Coordinator (rank 0) control loop.
//!
//! 1. Generate the grid and keep a pristine copy.
//! 2. Distribute rows round-robin to the workers.
//! 3. Barrier: nobody computes before every rank has its rows.
//! 4. For each owned row in slot order: compute and forward every column,
//!    write the row back, then merge the band of peer rows that lies
//!    between the previous owned row and this one.
//! 5. Merge the band after the last owned row.
//! 6. Barrier: every rank has finished forwarding and reporting.
//! 7. Recompute sequentially from the pristine copy and compare.

use crate::algs::communicator::Communicator;
use crate::algs::exchange::recv_values;
use crate::algs::pipeline::distribute::{distribute_rows, local_tasks};
use crate::algs::pipeline::process_row;
use crate::algs::tag::{MessageKind, encode};
use crate::algs::validate::{Mismatch, compare, reference_pass};
use crate::config::RunConfig;
use crate::data::grid::Grid;
use crate::debug_invariants::DebugInvariants;
use crate::stencil_error::StencilError;
use crate::topology::context::ProcessContext;
use log::{debug, info, warn};

/// Life cycle of one coordinator-owned row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowState {
    Pending,
    ComputingColumns,
    LocallyDone,
    AwaitingPeers,
    Integrated,
}

struct RowLedger {
    rank: usize,
    rows: Vec<usize>,
    states: Vec<RowState>,
}

impl RowLedger {
    fn new(rank: usize, rows: Vec<usize>) -> Self {
        let states = vec![RowState::Pending; rows.len()];
        Self { rank, rows, states }
    }

    fn advance(&mut self, slot: usize, to: RowState) {
        debug_assert!(self.states[slot] < to, "row state went backwards");
        debug!(
            "[rank {}] row {}: {:?} -> {to:?}",
            self.rank, self.rows[slot], self.states[slot]
        );
        self.states[slot] = to;
    }
}

/// Everything the coordinator knows at the end of a run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The generated grid before the pass.
    pub initial: Grid,
    /// The pipelined result assembled from all ranks.
    pub result: Grid,
    pub ranks: usize,
    pub rows_per_rank: usize,
    /// First disagreement with the sequential reference, if any.
    pub mismatch: Option<Mismatch>,
    /// Final state of every coordinator-owned row.
    pub row_states: Vec<RowState>,
}

impl RunReport {
    pub fn is_valid(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Receive and merge the `P - 1` peer rows directly below `owned_row`.
fn collect_band<C: Communicator>(
    comm: &C,
    ctx: &ProcessContext,
    grid: &mut Grid,
    owned_row: usize,
) -> Result<(), StencilError> {
    for offset in 1..ctx.ranks {
        let row = owned_row + offset;
        if row >= ctx.rows {
            break;
        }
        let (owner, _) = ctx.topology().owner(row);
        let tag = encode(MessageKind::RowDone, row, 0)?;
        debug!(
            "[rank {}] waiting for row {row} from rank {owner} (tag={tag:#x})",
            ctx.rank
        );
        let values = recv_values(comm, owner, tag, ctx.cols)?;
        info!("[rank {}] received row {row} from rank {owner}", ctx.rank);
        grid.set_row(row, &values)?;
    }
    Ok(())
}

/// Run the coordinator role on `comm`, which must be rank 0.
pub fn run_coordinator<C: Communicator>(
    comm: &C,
    config: &RunConfig,
) -> Result<RunReport, StencilError> {
    let ctx = ProcessContext::new(config, comm.rank(), comm.size())?;

    let mut grid = Grid::random(config.rows, config.cols, config.seed);
    let pristine = grid.clone();
    info!(
        "[rank {}] generated {}x{} grid (seed {})",
        ctx.rank, ctx.rows, ctx.cols, config.seed
    );
    info!("[rank {}] rows per process: {}", ctx.rank, ctx.rows_per_rank);

    distribute_rows(comm, &ctx, &grid)?;
    let mut tasks = local_tasks(&ctx, &grid);
    let mut ledger = RowLedger::new(ctx.rank, tasks.iter().map(|t| t.index).collect());

    comm.barrier()?;

    let mut previous: Option<(usize, usize)> = None;
    for (slot, task) in tasks.iter_mut().enumerate() {
        if ctx.ranks == 1 {
            // The row above is this rank's own finished row.
            if let Some((_, prev_row)) = previous {
                task.above.prime(grid.row(prev_row));
            }
        }
        ledger.advance(slot, RowState::ComputingColumns);
        process_row(comm, &ctx, task)?;
        grid.set_row(task.index, &task.current)?;
        ledger.advance(slot, RowState::LocallyDone);

        if let Some((prev_slot, prev_row)) = previous {
            ledger.advance(prev_slot, RowState::AwaitingPeers);
            collect_band(comm, &ctx, &mut grid, prev_row)?;
            ledger.advance(prev_slot, RowState::Integrated);
        }
        previous = Some((slot, task.index));
    }

    if let Some((last_slot, last_row)) = previous {
        ledger.advance(last_slot, RowState::AwaitingPeers);
        collect_band(comm, &ctx, &mut grid, last_row)?;
        ledger.advance(last_slot, RowState::Integrated);
    }

    comm.barrier()?;
    grid.debug_assert_invariants();

    let reference = reference_pass(&pristine);
    let mismatch = compare(&reference, &grid)?;
    match &mismatch {
        None => info!("[rank {}] result matches the sequential reference", ctx.rank),
        Some(m) => warn!("[rank {}] {m}", ctx.rank),
    }

    Ok(RunReport {
        initial: pristine,
        result: grid,
        ranks: ctx.ranks,
        rows_per_rank: ctx.rows_per_rank,
        mismatch,
        row_states: ledger.states,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::NoComm;

    #[test]
    fn single_rank_run_needs_no_messages() {
        let cfg = RunConfig::new(5, 4).with_seed(3);
        let report = run_coordinator(&NoComm, &cfg).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.result, reference_pass(&report.initial));
        assert!(report.row_states.iter().all(|s| *s == RowState::Integrated));
    }
}
