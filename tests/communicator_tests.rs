use ring_stencil::algs::communicator::{CommTag, Communicator, LocalComm, NoComm, Wait};
use ring_stencil::stencil_error::StencilError;
use std::thread;
use std::time::Duration;

#[test]
fn local_round_trip() {
    let comms = LocalComm::universe(2);
    let tag = CommTag::new(0x1000);
    let _s = comms[0].isend(1, tag, b"hello");
    let mut buf = [0u8; 5];
    let got = comms[1].irecv(0, tag, &mut buf).wait().unwrap();
    assert_eq!(&got, b"hello");
}

#[test]
fn local_fifo_order_per_tag() {
    let comms = LocalComm::universe(2);
    let tag = CommTag::new(0x1001);
    for i in 0..10u8 {
        comms[0].isend(1, tag, &[i]);
    }
    let out: Vec<u8> = (0..10)
        .map(|_| comms[1].irecv(0, tag, &mut [0u8; 1]).wait().unwrap()[0])
        .collect();
    assert_eq!(out, (0u8..10u8).collect::<Vec<_>>());
}

#[test]
fn receive_selects_by_tag_not_arrival_order() {
    let comms = LocalComm::universe(2);
    const TAG_A: CommTag = CommTag::new(0xA100);
    const TAG_B: CommTag = CommTag::new(0xB200);
    comms[0].isend(1, TAG_B, &[2]);
    comms[0].isend(1, TAG_A, &[1]);
    assert_eq!(comms[1].irecv(0, TAG_A, &mut []).wait(), Some(vec![1]));
    assert_eq!(comms[1].irecv(0, TAG_B, &mut []).wait(), Some(vec![2]));
}

#[test]
fn receive_selects_by_source() {
    let comms = LocalComm::universe(3);
    let tag = CommTag::new(9);
    comms[2].isend(0, tag, &[2]);
    comms[1].isend(0, tag, &[1]);
    assert_eq!(comms[0].irecv(1, tag, &mut []).wait(), Some(vec![1]));
    assert_eq!(comms[0].irecv(2, tag, &mut []).wait(), Some(vec![2]));
}

#[test]
fn barrier_releases_only_when_all_arrive() {
    let comms = LocalComm::universe(3);
    thread::scope(|s| {
        let handles: Vec<_> = comms
            .iter()
            .enumerate()
            .map(|(k, c)| {
                s.spawn(move || {
                    thread::sleep(Duration::from_millis(10 * k as u64));
                    c.barrier().unwrap();
                    c.barrier().unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    });
}

#[test]
fn abort_releases_barrier() {
    let comms = LocalComm::universe(2);
    thread::scope(|s| {
        let waiter = s.spawn(|| comms[0].barrier());
        thread::sleep(Duration::from_millis(20));
        comms[1].abort(2);
        assert!(matches!(
            waiter.join().unwrap(),
            Err(StencilError::Aborted { code: 2 })
        ));
    });
    assert!(matches!(
        comms[1].barrier(),
        Err(StencilError::Aborted { code: 2 })
    ));
}

#[test]
fn no_comm_is_nop() {
    let comm = NoComm;
    let mut buf = [0u8; 8];
    assert!(comm.irecv(0, CommTag::new(123), &mut buf).wait().is_none());
    assert!(comm.isend(0, CommTag::new(123), &[]).wait().is_none());
}

#[cfg(feature = "mpi-support")]
#[test]
fn mpi_comm_smoke_if_available() {
    use ring_stencil::algs::communicator::MpiComm;
    let world = MpiComm::new().expect("MPI initialization failed");
    let me = world.rank();
    let n = world.size();
    let tag = CommTag::new(0xCAFE);
    let to = (me + 1) % n;
    let from = (me + n - 1) % n;
    let tx = [42u8, me as u8, 0, 0];
    let s = world.isend(to, tag, &tx);
    let got = world.irecv(from, tag, &mut [0u8; 4]).wait().expect("mpi rx");
    assert_eq!(got, [42u8, from as u8, 0, 0]);
    let _ = s.wait();
}
