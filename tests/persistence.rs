use std::path::PathBuf;

use lockstep::graph::generators::{house_graph, wheel_graph};
use lockstep::graph::persistence::{load, save};
use lockstep::{traverse_bfs, GraphError, Graph, MappedGraph};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lockstep-{name}-{}.csr", std::process::id()))
}

#[test]
fn save_then_map_round_trips() {
    let path = scratch_path("roundtrip");
    let g = wheel_graph(30).unwrap();
    save(&g, &path).unwrap();

    let mapped = MappedGraph::open(&path).unwrap();
    let view = mapped.graph(false).unwrap();
    assert_eq!(view, g);
    assert_eq!(traverse_bfs(&view, 0, 3).unwrap(), traverse_bfs(&g, 0, 3).unwrap());

    let owned = load(&path, false).unwrap();
    assert_eq!(owned, g);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn odd_forward_index_count_misaligns_backward_indptr() {
    let path = scratch_path("misaligned");
    let g = Graph::from_edge_pairs(&[(0, 1), (1, 2), (2, 0)], 3, true).unwrap();
    assert_eq!(g.forward().indices().len() % 2, 1);
    save(&g, &path).unwrap();

    let mapped = MappedGraph::open(&path).unwrap();
    assert_eq!(mapped.len_bytes(), 32 + 4 * 8 + 3 * 4 + 4 * 8 + 3 * 4);
    let view = mapped.graph(true).unwrap();
    assert_eq!(view, g);
    assert_eq!(view.in_neighbors(0), &[2]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn truncated_file_is_rejected() {
    let path = scratch_path("truncated");
    save(&house_graph().unwrap(), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    assert!(matches!(load(&path, false), Err(GraphError::MalformedRecord { .. })));
    let mapped = MappedGraph::open(&path).unwrap();
    assert!(matches!(mapped.graph(false), Err(GraphError::MalformedRecord { .. })));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let path = scratch_path("does-not-exist");
    assert!(matches!(MappedGraph::open(&path), Err(GraphError::Io(_))));
    assert!(matches!(load(&path, true), Err(GraphError::Io(_))));
}
