use woh_graph::{hairy_graphs, Graph};

fn check_shape(graph: &Graph, n_vertices: usize, n_hairs: usize) {
    assert_eq!(graph.order(), n_vertices + n_hairs);
    assert!(graph.is_connected());
    for v in 0..n_vertices {
        assert!(graph.degree(v) >= 3, "internal vertex {v} is not trivalent");
    }
    for h in n_vertices..n_vertices + n_hairs {
        assert_eq!(graph.degree(h), 1, "hair {h} is not a leaf");
        assert!(graph.neighbors(h).iter().all(|&w| w < n_vertices) || n_vertices == 0);
    }
}

#[test]
fn double_leg_is_the_only_graph_without_vertices() {
    let legs = hairy_graphs(0, 0, 2).unwrap();
    assert_eq!(legs.len(), 1);
    assert_eq!(legs[0].size(), 1);
    assert!(hairy_graphs(0, 0, 3).unwrap().is_empty());
    assert!(hairy_graphs(0, 1, 2).unwrap().is_empty());
}

#[test]
fn single_vertex_stars() {
    assert!(hairy_graphs(1, 0, 2).unwrap().is_empty());
    for hairs in 3..7 {
        let stars = hairy_graphs(1, 0, hairs).unwrap();
        assert_eq!(stars.len(), 1);
        check_shape(&stars[0], 1, hairs);
    }
    assert!(hairy_graphs(1, 1, 3).unwrap().is_empty());
}

#[test]
fn small_trees_and_cycles() {
    let cases = [
        ((2, 0, 4), 1),
        ((2, 0, 5), 1),
        ((2, 0, 6), 2),
        ((3, 0, 5), 1),
        ((3, 0, 6), 2),
        ((3, 1, 3), 1),
        ((2, 1, 4), 0),
    ];
    for ((vertices, loops, hairs), expected) in cases {
        let graphs = hairy_graphs(vertices, loops, hairs).unwrap();
        assert_eq!(graphs.len(), expected, "vertices={vertices} loops={loops} hairs={hairs}");
        for graph in &graphs {
            check_shape(graph, vertices, hairs);
            assert_eq!(graph.size(), vertices - 1 + loops + hairs);
        }
    }
}
