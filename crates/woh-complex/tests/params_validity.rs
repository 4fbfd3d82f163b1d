use woh_complex::{excess, AggregatedParams, ComponentParams, FinalParams};

#[test]
fn excess_counts_genus_legs_and_omegas() {
    assert_eq!(excess(5, 6, 11), 2);
    assert_eq!(excess(5, 6, 12), 0);
    assert_eq!(excess(1, 0, 1), -2);
}

#[test]
fn double_legs_need_two_hairs_each() {
    assert!(AggregatedParams::new(2, 0, 1, 2, 2, 0, 2).is_valid());
    assert!(!AggregatedParams::new(1, 0, 1, 0, 2, 0, 2).is_valid());
    // Two hairs cannot fill two double legs.
    assert!(!AggregatedParams::new(2, 0, 1, 0, 2, 0, 2).is_valid());
}

#[test]
fn every_component_touches_an_omega_or_epsilon() {
    let numbered_only = ComponentParams::new(1, 0, 3, 0, 0);
    assert!(!numbered_only.is_valid());
    assert!(ComponentParams::new(1, 0, 2, 1, 0).is_valid());
}

#[test]
fn epsilons_are_bounded_by_excess_and_vertices() {
    let one_epsilon = AggregatedParams::new(1, 1, 3, 0, 2, 1, 0);
    assert_eq!(one_epsilon.excess(), 2);
    assert!(one_epsilon.is_valid());
    // Two epsilons on the only vertex.
    let two_epsilons = AggregatedParams::new(1, 1, 4, 0, 2, 2, 0);
    assert_eq!(two_epsilons.n_edges(), 0);
    assert!(!two_epsilons.is_valid());
}

#[test]
fn single_vertex_trees_need_the_excess_identity() {
    for (n_numbered, n_omega) in [(0, 3), (1, 2), (2, 1), (2, 4)] {
        let tree = AggregatedParams::new(1, 1, n_omega, n_numbered, n_omega, 0, 0);
        assert_eq!(tree.n_edges(), 0);
        assert!(tree.is_valid(), "{}", tree.file_stem());
    }
    // One inner edge on a single vertex would be a tadpole.
    assert!(!AggregatedParams::new(1, 1, 4, 0, 3, 0, 0).is_valid());
}

#[test]
fn final_tuples_need_non_negative_vertex_counts() {
    assert_eq!(FinalParams::new(7, 2, 11, 20).n_vertices(), 3);
    assert_eq!(FinalParams::new(1, 11, 11, 11).n_vertices(), 0);
    assert!(!FinalParams::new(7, 2, 11, 16).is_valid());
    assert!(!FinalParams::new(0, 2, 11, 30).is_valid());
}
