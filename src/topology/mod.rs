//! Row ownership and per-rank context.

pub mod context;
pub mod ring;

pub use context::ProcessContext;
pub use ring::RowTopology;
