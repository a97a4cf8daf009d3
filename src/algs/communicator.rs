//! Thin façade over intra-process (threads) or inter-process (MPI) message passing.
//!
//! Messages are *contiguous byte slices* addressed by `(source rank, tag)`.
//! A receive only ever matches a message with the same source and tag, no
//! matter what else is in flight; messages sharing both are delivered in
//! send order. Receive handles are **waitable**: the pipeline posts a
//! receive and calls `.wait()` before it trusts the data.

use crate::stencil_error::StencilError;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Message tag. Built by [`crate::algs::tag::encode`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct CommTag(u32);

impl CommTag {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CommTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommTag({:#x})", self.0)
    }
}

impl fmt::LowerHex for CommTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Point-to-point communication interface plus the two group operations the
/// pipeline needs (barrier, abort).
pub trait Communicator {
    /// Handle returned by `isend`.
    type SendHandle: Wait;
    /// Handle returned by `irecv`.
    type RecvHandle: Wait;

    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) -> Self::SendHandle;
    /// Post a receive sized by `buf`; the payload is returned by `wait()`.
    fn irecv(&self, peer: usize, tag: CommTag, buf: &mut [u8]) -> Self::RecvHandle;

    /// Block until every rank of the group has arrived.
    fn barrier(&self) -> Result<(), StencilError>;

    /// Tear down the whole group. Blocked peers observe [`StencilError::Aborted`].
    fn abort(&self, code: i32);

    /// Abort code, if the group has been aborted.
    fn aborted(&self) -> Option<i32> {
        None
    }
}

/// Anything that can be waited on.
pub trait Wait {
    /// Wait for completion and return the received data (if any).
    fn wait(self) -> Option<Vec<u8>>;
}

impl Wait for () {
    fn wait(self) -> Option<Vec<u8>> {
        None
    }
}

/// Single-rank no-op comm for pure serial runs and unit tests.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Communicator for NoComm {
    type SendHandle = ();
    type RecvHandle = ();

    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn isend(&self, _peer: usize, _tag: CommTag, _buf: &[u8]) {}
    fn irecv(&self, _peer: usize, _tag: CommTag, _buf: &mut [u8]) {}
    fn barrier(&self) -> Result<(), StencilError> {
        Ok(())
    }
    fn abort(&self, _code: i32) {}
}

// --- LocalComm: ranks as threads of one process ---

type Key = (usize, usize, u32); // (src, dst, tag)

#[derive(Default)]
struct BarrierState {
    arrived: usize,
    generation: u64,
}

struct Shared {
    size: usize,
    mailbox: DashMap<Key, VecDeque<Bytes>>,
    signal: Mutex<()>,
    delivered: Condvar,
    barrier: Mutex<BarrierState>,
    released: Condvar,
    abort_code: OnceLock<i32>,
}

impl Shared {
    fn pop(&self, key: &Key) -> Option<Bytes> {
        self.mailbox.get_mut(key).and_then(|mut q| q.pop_front())
    }
}

/// One rank's handle onto an in-process group created by [`LocalComm::universe`].
#[derive(Clone)]
pub struct LocalComm {
    rank: usize,
    shared: Arc<Shared>,
}

impl fmt::Debug for LocalComm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalComm")
            .field("rank", &self.rank)
            .field("size", &self.shared.size)
            .finish()
    }
}

impl LocalComm {
    /// Create `size` connected ranks; element `k` is rank `k`.
    pub fn universe(size: usize) -> Vec<LocalComm> {
        let shared = Arc::new(Shared {
            size,
            mailbox: DashMap::new(),
            signal: Mutex::new(()),
            delivered: Condvar::new(),
            barrier: Mutex::new(BarrierState::default()),
            released: Condvar::new(),
            abort_code: OnceLock::new(),
        });
        (0..size)
            .map(|rank| LocalComm {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    /// Messages sent but not yet received, across the whole group.
    pub fn pending(&self) -> usize {
        self.shared.mailbox.iter().map(|q| q.len()).sum()
    }
}

/// Receive handle for [`LocalComm`]; blocks in `wait()` until a matching
/// message arrives or the group is aborted.
pub struct LocalHandle {
    shared: Arc<Shared>,
    key: Key,
}

impl Wait for LocalHandle {
    fn wait(self) -> Option<Vec<u8>> {
        let shared = &self.shared;
        let mut guard = shared.signal.lock();
        loop {
            if let Some(bytes) = shared.pop(&self.key) {
                return Some(bytes.to_vec());
            }
            if shared.abort_code.get().is_some() {
                return None;
            }
            shared.delivered.wait(&mut guard);
        }
    }
}

impl Communicator for LocalComm {
    type SendHandle = ();
    type RecvHandle = LocalHandle;

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) -> Self::SendHandle {
        let key = (self.rank, peer, tag.as_u32());
        self.shared
            .mailbox
            .entry(key)
            .or_default()
            .push_back(Bytes::copy_from_slice(buf));
        let _guard = self.shared.signal.lock();
        self.shared.delivered.notify_all();
    }

    fn irecv(&self, peer: usize, tag: CommTag, _buf: &mut [u8]) -> Self::RecvHandle {
        LocalHandle {
            shared: Arc::clone(&self.shared),
            key: (peer, self.rank, tag.as_u32()),
        }
    }

    fn barrier(&self) -> Result<(), StencilError> {
        let shared = &self.shared;
        let mut state = shared.barrier.lock();
        if let Some(&code) = shared.abort_code.get() {
            return Err(StencilError::Aborted { code });
        }
        let generation = state.generation;
        state.arrived += 1;
        if state.arrived == shared.size {
            state.arrived = 0;
            state.generation += 1;
            shared.released.notify_all();
            return Ok(());
        }
        while state.generation == generation {
            if let Some(&code) = shared.abort_code.get() {
                return Err(StencilError::Aborted { code });
            }
            shared.released.wait(&mut state);
        }
        Ok(())
    }

    fn abort(&self, code: i32) {
        let shared = &self.shared;
        if shared.abort_code.set(code).is_ok() {
            log::warn!("[rank {}] aborting process group (code {code})", self.rank);
        }
        {
            let _guard = shared.signal.lock();
            shared.delivered.notify_all();
        }
        let _state = shared.barrier.lock();
        shared.released.notify_all();
    }

    fn aborted(&self) -> Option<i32> {
        self.shared.abort_code.get().copied()
    }
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::{CommTag, Wait};
    use crate::stencil_error::StencilError;
    use mpi::environment::Universe;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::*;

    /// MPI world communicator. Dropping it finalizes MPI.
    pub struct MpiComm {
        pub world: SimpleCommunicator,
        rank: usize,
        size: usize,
        _universe: Universe,
    }

    impl MpiComm {
        pub fn new() -> Result<Self, StencilError> {
            let universe = mpi::initialize().ok_or(StencilError::NoMpi)?;
            let world = universe.world();
            let rank = world.rank() as usize;
            let size = world.size() as usize;
            Ok(Self {
                world,
                rank,
                size,
                _universe: universe,
            })
        }
    }

    /// Receives complete eagerly inside `irecv`; the handle just carries the data.
    pub struct MpiHandle(Option<Vec<u8>>);

    impl Wait for MpiHandle {
        fn wait(self) -> Option<Vec<u8>> {
            self.0
        }
    }

    impl super::Communicator for MpiComm {
        type SendHandle = ();
        type RecvHandle = MpiHandle;

        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) {
            self.world
                .process_at_rank(peer as i32)
                .send_with_tag(buf, tag.as_u32() as i32);
        }

        fn irecv(&self, peer: usize, tag: CommTag, _buf: &mut [u8]) -> MpiHandle {
            let (data, _status) = self
                .world
                .process_at_rank(peer as i32)
                .receive_vec_with_tag::<u8>(tag.as_u32() as i32);
            MpiHandle(Some(data))
        }

        fn barrier(&self) -> Result<(), StencilError> {
            self.world.barrier();
            Ok(())
        }

        fn abort(&self, code: i32) {
            self.world.abort(code)
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
