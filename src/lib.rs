#![cfg_attr(docsrs, feature(doc_cfg))]
//! # ring-stencil
//!
//! ring-stencil computes one stencil-averaging pass over an integer grid
//! whose rows are striped round-robin across a ring of cooperating ranks.
//! Every cell becomes the floor-average of its existing up-to-8 neighbours.
//!
//! The interesting part is the pipeline: a rank may start row `r` before
//! the owner of row `r - 1` has finished it, because every finished element
//! is forwarded to the ring successor under its own `(kind, row, column)`
//! tag. A per-row dependency cache guarantees each borrowed element is
//! received exactly once. The coordinator (rank 0) reassembles the grid and
//! checks it against a sequential reference pass.
//!
//! ## Features
//! - Tag codec, round-robin row topology and write-once dependency cache
//! - Pluggable communication backends: serial ([`NoComm`](algs::communicator::NoComm)),
//!   in-process threads ([`LocalComm`](algs::communicator::LocalComm)) and MPI
//!   (`MpiComm`, feature `mpi-support`)
//! - Group-wide abort: a failing rank wakes every blocked peer
//!
//! ## Determinism
//!
//! The grid is drawn from a `SmallRng` seeded by [`RunConfig::seed`](config::RunConfig),
//! so runs are reproducible. Unit tests fix seeds explicitly.
//!
//! ## Usage
//!
//! ```no_run
//! use ring_stencil::prelude::*;
//!
//! let report = run_local(&RunConfig::new(8, 8), 4)?;
//! assert!(report.is_valid());
//! # Ok::<(), ring_stencil::stencil_error::StencilError>(())
//! ```

pub mod algs;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod runner;
pub mod stencil_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// Rank that generates, distributes, reassembles and validates the grid.
pub const COORDINATOR: usize = 0;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::communicator::{CommTag, Communicator, LocalComm, NoComm, Wait};
    pub use crate::algs::pipeline::{RowState, RunReport};
    pub use crate::algs::tag::{MessageKind, decode, encode};
    pub use crate::algs::validate::{Mismatch, reference_pass};
    pub use crate::config::RunConfig;
    pub use crate::data::grid::Grid;
    pub use crate::data::row_task::{DependencyCache, RowTask};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::runner::{run_local, run_rank};
    pub use crate::stencil_error::StencilError;
    pub use crate::topology::{ProcessContext, RowTopology};
}
