//! Tag codec: packs `(kind, row, column)` into one message tag.
//!
//! Layout (low to high): 10 bits column, 10 bits row, 3 bits kind.
//! Decoding recovers the exact triple for every row and column below 1024,
//! so two logically distinct messages between the same pair of ranks never
//! share a tag.

use crate::algs::communicator::CommTag;
use crate::stencil_error::StencilError;
use static_assertions::const_assert;

pub const FIELD_BITS: u32 = 10;
pub const KIND_BITS: u32 = 3;
pub const ROW_SHIFT: u32 = FIELD_BITS;
pub const KIND_SHIFT: u32 = 2 * FIELD_BITS;
const FIELD_MASK: u32 = (1 << FIELD_BITS) - 1;
const KIND_MASK: u32 = (1 << KIND_BITS) - 1;

/// Largest encodable row or column index.
pub const MAX_INDEX: usize = FIELD_MASK as usize;

// The 1000x1000 grid ceiling must fit the index fields, and the whole tag
// must stay a non-negative MPI tag.
const_assert!(crate::config::MAX_ROWS <= MAX_INDEX + 1);
const_assert!(crate::config::MAX_COLUMNS <= MAX_INDEX + 1);
const_assert!(KIND_SHIFT + KIND_BITS < 31);

/// What a message carries.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Global index of the worker's next assigned row (row field = local slot).
    RowIndex = 2,
    /// Values of an assigned row.
    CurrentRow = 3,
    /// Pristine values of the row below an assigned row.
    NextRow = 4,
    /// One finished element forwarded to the ring successor.
    ElementDone = 5,
    /// A finished row reported to the coordinator.
    RowDone = 6,
    /// Number of rows assigned to a worker.
    RowCount = 7,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::RowCount,
        MessageKind::RowIndex,
        MessageKind::CurrentRow,
        MessageKind::NextRow,
        MessageKind::ElementDone,
        MessageKind::RowDone,
    ];

    pub fn from_bits(bits: u32) -> Result<Self, StencilError> {
        match bits {
            2 => Ok(MessageKind::RowIndex),
            3 => Ok(MessageKind::CurrentRow),
            4 => Ok(MessageKind::NextRow),
            5 => Ok(MessageKind::ElementDone),
            6 => Ok(MessageKind::RowDone),
            7 => Ok(MessageKind::RowCount),
            other => Err(StencilError::UnknownMessageKind(other)),
        }
    }
}

fn check_field(field: &'static str, value: usize) -> Result<u32, StencilError> {
    if value > MAX_INDEX {
        return Err(StencilError::TagOutOfRange {
            field,
            value,
            max: MAX_INDEX,
        });
    }
    Ok(value as u32)
}

/// Pack `(kind, row, col)` into a tag.
///
/// # Errors
/// [`StencilError::TagOutOfRange`] if `row` or `col` exceeds [`MAX_INDEX`].
pub fn encode(kind: MessageKind, row: usize, col: usize) -> Result<CommTag, StencilError> {
    let row = check_field("row", row)?;
    let col = check_field("column", col)?;
    Ok(CommTag::new(
        ((kind as u32) << KIND_SHIFT) | (row << ROW_SHIFT) | col,
    ))
}

/// Unpack a tag produced by [`encode`].
///
/// # Errors
/// [`StencilError::UnknownMessageKind`] if the kind bits name no kind.
pub fn decode(tag: CommTag) -> Result<(MessageKind, usize, usize), StencilError> {
    let raw = tag.as_u32();
    let kind = MessageKind::from_bits((raw >> KIND_SHIFT) & KIND_MASK)?;
    let row = ((raw >> ROW_SHIFT) & FIELD_MASK) as usize;
    let col = (raw & FIELD_MASK) as usize;
    Ok((kind, row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_legacy_layout() {
        // kind << 20 | row << 10 | col
        let t = encode(MessageKind::ElementDone, 3, 7).unwrap();
        assert_eq!(t.as_u32(), (5 << 20) | (3 << 10) | 7);
    }

    #[test]
    fn corners_roundtrip() {
        for kind in MessageKind::ALL {
            for (r, c) in [(0, 0), (0, MAX_INDEX), (MAX_INDEX, 0), (999, 999)] {
                assert_eq!(decode(encode(kind, r, c).unwrap()).unwrap(), (kind, r, c));
            }
        }
    }

    #[test]
    fn rejects_wide_fields() {
        assert!(matches!(
            encode(MessageKind::RowDone, 1024, 0),
            Err(StencilError::TagOutOfRange { field: "row", .. })
        ));
        assert!(matches!(
            encode(MessageKind::RowDone, 0, 4096),
            Err(StencilError::TagOutOfRange { field: "column", .. })
        ));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(matches!(
            decode(CommTag::new(1 << KIND_SHIFT)),
            Err(StencilError::UnknownMessageKind(1))
        ));
    }
}
