use proptest::prelude::*;
use ring_stencil::config::RunConfig;
use ring_stencil::topology::{ProcessContext, RowTopology};

proptest! {
    #[test]
    fn row_above_is_owned_by_predecessor(ranks in 1usize..16, per_rank in 1usize..8) {
        let topo = RowTopology::new(ranks * per_rank, ranks).unwrap();
        for k in 0..ranks {
            for row in topo.rows_of(k).filter(|&r| r > 0) {
                let (owner, _) = topo.owner(row - 1);
                prop_assert_eq!(owner, topo.predecessor(k));
            }
        }
    }

    #[test]
    fn owner_inverts_global_row(ranks in 1usize..16, per_rank in 1usize..8) {
        let topo = RowTopology::new(ranks * per_rank, ranks).unwrap();
        for k in 0..ranks {
            for slot in 0..per_rank {
                prop_assert_eq!(topo.owner(topo.global_row(k, slot)), (k, slot));
            }
        }
    }
}

#[test]
fn every_row_has_exactly_one_owner() {
    let topo = RowTopology::new(12, 4).unwrap();
    let mut all: Vec<usize> = (0..4).flat_map(|k| topo.rows_of(k)).collect();
    all.sort_unstable();
    assert_eq!(all, (0..12).collect::<Vec<_>>());
}

#[test]
fn context_derives_ring_neighbours() {
    let cfg = RunConfig::new(6, 4);
    let ctx = ProcessContext::new(&cfg, 0, 3).unwrap();
    assert!(ctx.is_coordinator());
    assert_eq!((ctx.predecessor(), ctx.successor()), (2, 1));
    assert_eq!(ctx.owned_rows().collect::<Vec<_>>(), vec![0, 3]);
    assert!(ProcessContext::new(&cfg, 3, 3).is_err());
}
