//! Re-export public algorithms.

pub mod communicator;
pub mod exchange;
pub mod fetch;
pub mod pipeline;
pub mod stencil;
pub mod tag;
pub mod validate;
pub mod wire;

pub use pipeline::{run_coordinator, run_worker};
pub use stencil::{compute_cell, stencil_cell};
pub use validate::{compare, reference_pass};
