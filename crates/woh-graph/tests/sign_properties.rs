use proptest::prelude::*;
use woh_graph::perm::{
    compose, cross_permutations, inverse, is_permutation, multiset_permutation_count,
    multiset_permutations, permutation_sign, transposition,
};
use woh_graph::{canonical_image, perm_sign, Graph, Layout};

/// Random graph whose vertices split into an omega block `0..split` and an epsilon
/// block `split..n`, plus two relabelings preserving both blocks.
fn decorated_with_relabelings() -> impl Strategy<Value = (Graph, Layout, Vec<usize>, Vec<usize>)> {
    (2usize..8)
        .prop_flat_map(|n| (Just(n), 0..=n, prop::collection::vec(any::<bool>(), n * (n - 1) / 2)))
        .prop_flat_map(|(n, split, bits)| {
            let block = |range: std::ops::Range<usize>| Just(range.collect::<Vec<_>>()).prop_shuffle();
            (
                Just(n),
                Just(split),
                Just(bits),
                block(0..split),
                block(split..n),
                block(0..split),
                block(split..n),
            )
        })
        .prop_map(|(n, split, bits, p_low, p_high, q_low, q_high)| {
            let mut edges = Vec::new();
            let mut idx = 0;
            for v in 1..n {
                for u in 0..v {
                    if bits[idx] {
                        edges.push((u, v));
                    }
                    idx += 1;
                }
            }
            let graph = Graph::from_edges(n, edges).unwrap();
            let layout = Layout::new(0, 0, split, n - split);
            let p = p_low.into_iter().chain(p_high).collect();
            let q = q_low.into_iter().chain(q_high).collect();
            (graph, layout, p, q)
        })
}

proptest! {
    #[test]
    fn perm_sign_is_a_cocycle((graph, layout, p, q) in decorated_with_relabelings()) {
        let pq = compose(&p, &q);
        let direct = perm_sign(&graph, &layout, &pq).unwrap();
        let relabeled = graph.relabel(&p).unwrap();
        let stepwise = perm_sign(&graph, &layout, &p).unwrap() * perm_sign(&relabeled, &layout, &q).unwrap();
        prop_assert_eq!(direct, stepwise);
    }

    #[test]
    fn canonical_sign_tracks_relabeling((graph, layout, p, _q) in decorated_with_relabelings()) {
        let relabeled = graph.relabel(&p).unwrap();
        let original = canonical_image(&graph, &layout).unwrap();
        let moved = canonical_image(&relabeled, &layout).unwrap();
        prop_assert_eq!(&original.code, &moved.code);
        prop_assert_eq!(original.odd_automorphism, moved.odd_automorphism);
        if !original.odd_automorphism {
            let step = perm_sign(&graph, &layout, &p).unwrap();
            prop_assert_eq!(original.sign, step * moved.sign);
        }
    }

    #[test]
    fn inverse_cancels(p in Just((0..9).collect::<Vec<usize>>()).prop_shuffle()) {
        let inv = inverse(&p).unwrap();
        prop_assert_eq!(compose(&p, &inv), (0..9).collect::<Vec<_>>());
        prop_assert_eq!(permutation_sign(&p), permutation_sign(&inv));
    }
}

#[test]
fn transposition_is_odd() {
    assert_eq!(permutation_sign(&transposition(5, 1, 3)), -1);
    assert_eq!(permutation_sign(&transposition(5, 2, 2)), 1);
}

#[test]
fn multiset_permutations_match_count() {
    for (n, omega, epsilon) in [(0, 2, 0), (1, 1, 1), (2, 3, 1), (3, 0, 2)] {
        let perms = multiset_permutations(2, n, omega, epsilon);
        assert_eq!(perms.len() as u128, multiset_permutation_count(n, omega, epsilon));
        assert!(perms.iter().all(|p| is_permutation(p)));
        let mut unique = perms.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), perms.len());
    }
}

#[test]
fn cross_permutation_count_is_binomial() {
    assert_eq!(cross_permutations(&[], &[4, 5]).len(), 1);
    assert_eq!(cross_permutations(&[0, 1, 2], &[7, 8]).len(), 10);
    assert_eq!(cross_permutations(&[0, 1, 2], &[7, 8, 9]).len(), 20);
}

#[test]
fn swapping_two_omegas_on_an_edge_is_odd() {
    let edge = Graph::from_edges(2, [(0, 1)]).unwrap();
    let omegas = Layout::new(0, 0, 2, 0);
    let epsilons = Layout::new(0, 0, 0, 2);
    assert_eq!(perm_sign(&edge, &omegas, &[1, 0]).unwrap(), -1);
    assert_eq!(perm_sign(&edge, &epsilons, &[1, 0]).unwrap(), 1);
}

#[test]
fn non_bijective_relabeling_is_a_sign_error() {
    let edge = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
    let layout = Layout::new(1, 0, 2, 0);
    let err = perm_sign(&edge, &layout, &[0, 1, 1]).unwrap_err();
    assert!(err.is_fatal_sign());
    assert_eq!(err.info().code, "not-a-permutation");
}
