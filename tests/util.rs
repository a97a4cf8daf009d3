#![allow(dead_code)]
use ring_stencil::algs::communicator::{CommTag, Communicator, Wait};
use ring_stencil::algs::wire::{WireCount, cast_slice, encode_values};
use ring_stencil::stencil_error::StencilError;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

pub struct MockRecvHandle(Option<Vec<u8>>);

impl Wait for MockRecvHandle {
    fn wait(self) -> Option<Vec<u8>> {
        self.0
    }
}

/// One point-to-point call, in the order the rank issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Send { peer: usize, tag: u32 },
    Recv { peer: usize, tag: u32 },
}

/// Scripted communicator: receives are served from pre-loaded queues keyed
/// by `(peer, tag)` and every `irecv` is counted.
pub struct CountingComm {
    rank: usize,
    size: usize,
    inbox: RefCell<HashMap<(usize, u32), VecDeque<Vec<u8>>>>,
    pub recvs: Cell<usize>,
    pub sent: RefCell<Vec<(usize, u32, Vec<u8>)>>,
    pub events: RefCell<Vec<Event>>,
}

impl CountingComm {
    pub fn new(rank: usize, size: usize) -> Self {
        Self {
            rank,
            size,
            inbox: RefCell::new(HashMap::new()),
            recvs: Cell::new(0),
            sent: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Queue a single value as if `peer` had sent it with `tag`.
    pub fn preload(&self, peer: usize, tag: CommTag, value: i32) {
        self.preload_values(peer, tag, &[value]);
    }

    pub fn preload_values(&self, peer: usize, tag: CommTag, values: &[i32]) {
        self.push(peer, tag, encode_values(values));
    }

    pub fn preload_count(&self, peer: usize, tag: CommTag, n: usize) {
        let count = WireCount::new(n);
        self.push(peer, tag, cast_slice(std::slice::from_ref(&count)).to_vec());
    }

    fn push(&self, peer: usize, tag: CommTag, bytes: Vec<u8>) {
        self.inbox
            .borrow_mut()
            .entry((peer, tag.as_u32()))
            .or_default()
            .push_back(bytes);
    }
}

impl Communicator for CountingComm {
    type SendHandle = ();
    type RecvHandle = MockRecvHandle;

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn isend(&self, peer: usize, tag: CommTag, buf: &[u8]) {
        self.sent.borrow_mut().push((peer, tag.as_u32(), buf.to_vec()));
        self.events.borrow_mut().push(Event::Send {
            peer,
            tag: tag.as_u32(),
        });
    }

    fn irecv(&self, peer: usize, tag: CommTag, _buf: &mut [u8]) -> MockRecvHandle {
        self.recvs.set(self.recvs.get() + 1);
        self.events.borrow_mut().push(Event::Recv {
            peer,
            tag: tag.as_u32(),
        });
        let msg = self
            .inbox
            .borrow_mut()
            .get_mut(&(peer, tag.as_u32()))
            .and_then(|q| q.pop_front());
        MockRecvHandle(msg)
    }

    fn barrier(&self) -> Result<(), StencilError> {
        Ok(())
    }

    fn abort(&self, _code: i32) {}
}

pub fn seeds() -> impl Iterator<Item = u64> {
    [0u64, 1, 7, 42, 1234, 0xDEAD_BEEF].into_iter()
}
