//! Immutable per-rank record created once at startup.

use crate::config::RunConfig;
use crate::stencil_error::StencilError;
use crate::topology::ring::RowTopology;

/// Rank id, group size and grid shape as seen by one rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProcessContext {
    pub rank: usize,
    pub ranks: usize,
    pub rows: usize,
    pub cols: usize,
    pub rows_per_rank: usize,
    topology: RowTopology,
}

impl ProcessContext {
    /// # Errors
    /// Propagates [`RunConfig::validate`] failures and rejects out-of-range ranks.
    pub fn new(config: &RunConfig, rank: usize, ranks: usize) -> Result<Self, StencilError> {
        config.validate(ranks)?;
        let topology = RowTopology::new(config.rows, ranks)?;
        topology.check_rank(rank)?;
        Ok(Self {
            rank,
            ranks,
            rows: config.rows,
            cols: config.cols,
            rows_per_rank: topology.lines_per_rank(),
            topology,
        })
    }

    pub fn topology(&self) -> &RowTopology {
        &self.topology
    }

    pub fn predecessor(&self) -> usize {
        self.topology.predecessor(self.rank)
    }

    pub fn successor(&self) -> usize {
        self.topology.successor(self.rank)
    }

    /// Global rows this rank owns, in slot order.
    pub fn owned_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.topology.rows_of(self.rank)
    }

    pub fn is_coordinator(&self) -> bool {
        self.rank == crate::COORDINATOR
    }
}
