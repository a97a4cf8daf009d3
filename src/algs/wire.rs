//! Fixed little-endian wire types for grid values and counts.

use crate::stencil_error::StencilError;
use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

pub fn cast_slice_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

pub fn expect_exact_len(actual: usize, expected: usize) -> Result<(), StencilError> {
    if actual == expected {
        Ok(())
    } else {
        Err(StencilError::WireLength {
            expected,
            got: actual,
        })
    }
}

/// One grid value; stored pre-LE with `.to_le()` and decoded with `.from_le()`.
#[repr(transparent)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireValue {
    pub v_le: i32,
}

impl WireValue {
    pub fn new(v: i32) -> Self {
        Self { v_le: v.to_le() }
    }
    pub fn get(&self) -> i32 {
        i32::from_le(self.v_le)
    }
}

/// A row count or row index.
#[repr(transparent)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32,
}

impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u32).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// Encode a row of values for sending.
pub fn encode_values(values: &[i32]) -> Vec<u8> {
    let wire: Vec<WireValue> = values.iter().copied().map(WireValue::new).collect();
    cast_slice(&wire).to_vec()
}

/// Decode exactly `len` values.
pub fn decode_values(bytes: &[u8], len: usize) -> Result<Vec<i32>, StencilError> {
    expect_exact_len(bytes.len(), len * size_of::<WireValue>())?;
    let mut wire = vec![WireValue::zeroed(); len];
    cast_slice_mut(&mut wire).copy_from_slice(bytes);
    Ok(wire.iter().map(WireValue::get).collect())
}

const _: () = {
    assert!(size_of::<WireValue>() == 4);
    assert!(size_of::<WireCount>() == 4);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_the_wire() {
        let row = [0, -3, 9, i32::MAX];
        let bytes = encode_values(&row);
        assert_eq!(bytes.len(), 16);
        assert_eq!(decode_values(&bytes, 4).unwrap(), row);
    }

    #[test]
    fn short_payload_is_rejected() {
        let bytes = encode_values(&[1, 2]);
        assert!(matches!(
            decode_values(&bytes, 3),
            Err(StencilError::WireLength {
                expected: 12,
                got: 8
            })
        ));
    }

    #[test]
    fn count_is_little_endian() {
        let c = WireCount::new(258);
        assert_eq!(cast_slice(std::slice::from_ref(&c)), &[2, 1, 0, 0]);
        assert_eq!(c.get(), 258);
    }
}
