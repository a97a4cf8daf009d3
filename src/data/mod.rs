//! Grid storage and per-row work items.

pub mod grid;
pub mod row_task;

pub use grid::Grid;
pub use row_task::{DependencyCache, RowTask};
