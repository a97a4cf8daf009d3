use proptest::prelude::*;
use ring_stencil::algs::tag::{MAX_INDEX, MessageKind, decode, encode};
use std::collections::HashSet;

fn any_kind() -> impl Strategy<Value = MessageKind> {
    prop::sample::select(MessageKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn decode_inverts_encode(kind in any_kind(), row in 0usize..1000, col in 0usize..1000) {
        let tag = encode(kind, row, col).unwrap();
        prop_assert_eq!(decode(tag).unwrap(), (kind, row, col));
    }

    #[test]
    fn distinct_triples_get_distinct_tags(
        a in (any_kind(), 0usize..=MAX_INDEX, 0usize..=MAX_INDEX),
        b in (any_kind(), 0usize..=MAX_INDEX, 0usize..=MAX_INDEX),
    ) {
        let ta = encode(a.0, a.1, a.2).unwrap();
        let tb = encode(b.0, b.1, b.2).unwrap();
        prop_assert_eq!(a == b, ta == tb);
    }
}

#[test]
fn six_kinds_occupy_disjoint_tag_ranges() {
    let tags: HashSet<u32> = MessageKind::ALL
        .iter()
        .map(|&k| encode(k, 999, 999).unwrap().as_u32() >> 20)
        .collect();
    assert_eq!(tags.len(), 6);
}

#[test]
fn tags_fit_a_non_negative_mpi_tag() {
    for kind in MessageKind::ALL {
        let t = encode(kind, MAX_INDEX, MAX_INDEX).unwrap().as_u32();
        assert!(t <= i32::MAX as u32);
    }
}
