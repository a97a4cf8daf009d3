//! StencilError: Unified error type for ring-stencil public APIs
//!
//! Every fallible operation in the crate (configuration checks, tag encoding,
//! wire decoding, point-to-point exchanges) reports through this one type so
//! the SPMD entry point can decide uniformly whether to abort the group.

use thiserror::Error;

/// Unified error type for ring-stencil operations.
#[derive(Debug, Error)]
pub enum StencilError {
    /// Rows or columns exceed the supported grid ceiling.
    #[error("grid {rows}x{cols} exceeds the maximum of {max_rows}x{max_cols}")]
    GridTooLarge {
        rows: usize,
        cols: usize,
        max_rows: usize,
        max_cols: usize,
    },
    /// Rows or columns below the 2x2 minimum.
    #[error("grid {rows}x{cols} is too small (minimum is 2x2)")]
    GridTooSmall { rows: usize, cols: usize },
    /// The row count does not split evenly across the ranks.
    #[error("{rows} rows cannot be divided evenly across {ranks} ranks")]
    IndivisibleRows { rows: usize, ranks: usize },
    /// A grid was built from rows of differing length.
    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// A row or column index does not fit in its tag field.
    #[error("tag field `{field}` value {value} exceeds the maximum {max}")]
    TagOutOfRange {
        field: &'static str,
        value: usize,
        max: usize,
    },
    /// The kind bits of a tag do not name a known message kind.
    #[error("unknown message kind {0} in tag")]
    UnknownMessageKind(u32),
    /// A rank id or local slot outside the topology.
    #[error("rank {rank} is out of range for a group of {size}")]
    RankOutOfRange { rank: usize, size: usize },
    /// A column index beyond the row width.
    #[error("column {col} is out of range for a row of {cols} columns")]
    ColumnOutOfRange { col: usize, cols: usize },
    /// A grid whose storage does not hold exactly `rows * cols` values.
    #[error("grid {rows}x{cols} holds {len} values")]
    GridShape { rows: usize, cols: usize, len: usize },
    /// The coordinator assigned a rank a different number of rows than the
    /// topology gives it.
    #[error("rank {rank} was assigned {got} rows, expected {expected}")]
    AssignmentMismatch {
        rank: usize,
        expected: usize,
        got: usize,
    },
    /// A fetch was issued for the row above grid row 0.
    #[error("row {row} has no row above it")]
    NoRowAbove { row: usize },
    /// A payload arrived with the wrong number of bytes.
    #[error("wire payload length mismatch: expected {expected} bytes, got {got}")]
    WireLength { expected: usize, got: usize },
    /// A point-to-point exchange with `neighbor` failed.
    #[error("communication with rank {neighbor} failed: {source}")]
    CommError {
        neighbor: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The process group was aborted while this rank was blocked.
    #[error("process group aborted with code {code}")]
    Aborted { code: i32 },
    /// MPI could not be initialized (already initialized or unavailable).
    #[error("MPI initialization failed")]
    NoMpi,
}

impl StencilError {
    /// Exit code a process should report for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            StencilError::Aborted { code } => *code,
            _ => 1,
        }
    }
}
