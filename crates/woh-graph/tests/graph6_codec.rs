use woh_graph::graph6::{decode, encode};
use woh_graph::{connected_graphs, Graph};

#[test]
fn decodes_reference_strings() {
    let k4 = decode("C~").unwrap();
    assert_eq!(k4.order(), 4);
    assert_eq!(k4.size(), 6);
    let single = decode("@").unwrap();
    assert_eq!(single, Graph::empty(1));
}

#[test]
fn round_trips_generated_graphs() {
    for graph in connected_graphs(6, 7).unwrap() {
        let code = encode(&graph);
        let restored = decode(&code).unwrap();
        assert_eq!(restored, graph.enumerate_edges());
        assert_eq!(encode(&restored), code);
    }
}

#[test]
fn malformed_input_is_a_graph_error() {
    let err = decode("D\u{7f}").unwrap_err();
    assert!(err.info().code.starts_with("graph6"));
}

#[test]
fn graph_round_trips_json() {
    let graph = Graph::from_labeled_edges(4, [(0, 1, 2), (1, 3, 0), (2, 3, 1)]).unwrap();
    let json = serde_json::to_string(&graph).unwrap();
    let restored: Graph = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, graph);
}
