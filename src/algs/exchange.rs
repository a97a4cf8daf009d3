//! Typed point-to-point helpers over [`Communicator`].
//!
//! Every send is drained before returning. Every receive either yields a
//! payload of exactly the expected length or an error naming the peer; a
//! receive that fails because the group was aborted reports
//! [`StencilError::Aborted`].

use crate::algs::communicator::{CommTag, Communicator, Wait};
use crate::algs::wire::{
    WireCount, cast_slice, cast_slice_mut, decode_values, encode_values, expect_exact_len,
};
use crate::stencil_error::StencilError;
use std::mem::size_of;

fn recv_failure<C: Communicator>(comm: &C, peer: usize, tag: CommTag) -> StencilError {
    match comm.aborted() {
        Some(code) => StencilError::Aborted { code },
        None => StencilError::CommError {
            neighbor: peer,
            source: format!("no message with tag {tag:#x} from rank {peer}").into(),
        },
    }
}

pub fn send_values<C: Communicator>(comm: &C, peer: usize, tag: CommTag, values: &[i32]) {
    let bytes = encode_values(values);
    let _ = comm.isend(peer, tag, &bytes).wait();
}

pub fn send_value<C: Communicator>(comm: &C, peer: usize, tag: CommTag, value: i32) {
    send_values(comm, peer, tag, std::slice::from_ref(&value));
}

pub fn recv_values<C: Communicator>(
    comm: &C,
    peer: usize,
    tag: CommTag,
    len: usize,
) -> Result<Vec<i32>, StencilError> {
    let mut buf = vec![0u8; len * size_of::<i32>()];
    let data = comm
        .irecv(peer, tag, &mut buf)
        .wait()
        .ok_or_else(|| recv_failure(comm, peer, tag))?;
    decode_values(&data, len)
}

pub fn recv_value<C: Communicator>(
    comm: &C,
    peer: usize,
    tag: CommTag,
) -> Result<i32, StencilError> {
    Ok(recv_values(comm, peer, tag, 1)?[0])
}

pub fn send_count<C: Communicator>(comm: &C, peer: usize, tag: CommTag, n: usize) {
    let count = WireCount::new(n);
    let _ = comm
        .isend(peer, tag, cast_slice(std::slice::from_ref(&count)))
        .wait();
}

pub fn recv_count<C: Communicator>(
    comm: &C,
    peer: usize,
    tag: CommTag,
) -> Result<usize, StencilError> {
    let mut count = WireCount::new(0);
    let data = comm
        .irecv(peer, tag, cast_slice_mut(std::slice::from_mut(&mut count)))
        .wait()
        .ok_or_else(|| recv_failure(comm, peer, tag))?;
    expect_exact_len(data.len(), size_of::<WireCount>())?;
    cast_slice_mut(std::slice::from_mut(&mut count)).copy_from_slice(&data);
    Ok(count.get())
}
