//! Worker (rank > 0) control loop: receive rows, barrier, compute and
//! forward, report each finished row to the coordinator, final barrier.

use crate::COORDINATOR;
use crate::algs::communicator::Communicator;
use crate::algs::exchange::send_values;
use crate::algs::pipeline::distribute::receive_assignment;
use crate::algs::pipeline::process_row;
use crate::algs::tag::{MessageKind, encode};
use crate::config::RunConfig;
use crate::stencil_error::StencilError;
use crate::topology::context::ProcessContext;
use log::info;

pub fn run_worker<C: Communicator>(comm: &C, config: &RunConfig) -> Result<(), StencilError> {
    let ctx = ProcessContext::new(config, comm.rank(), comm.size())?;
    let mut tasks = receive_assignment(comm, &ctx)?;

    comm.barrier()?;

    for task in &mut tasks {
        process_row(comm, &ctx, task)?;
        info!(
            "[rank {}] sending finished row {} to rank {COORDINATOR}",
            ctx.rank, task.index
        );
        send_values(
            comm,
            COORDINATOR,
            encode(MessageKind::RowDone, task.index, 0)?,
            &task.current,
        );
    }

    comm.barrier()?;
    Ok(())
}
