//! Small named undirected graphs.
//!
//! These are the classic fixtures used to check traversal results by hand.

use crate::error::GraphError;
use crate::graph::Graph;
use crate::VertexId;

/// Path `0 - 1 - ... - (n-1)`.
pub fn path_graph(n: VertexId) -> Result<Graph<'static>, GraphError> {
    let edges: Vec<_> = (1..n).map(|v| (v - 1, v)).collect();
    Graph::from_edge_pairs(&edges, n as usize, false)
}

/// Cycle `0 - 1 - ... - (n-1) - 0`.
pub fn cycle_graph(n: VertexId) -> Result<Graph<'static>, GraphError> {
    let mut edges: Vec<_> = (1..n).map(|v| (v - 1, v)).collect();
    if n > 2 {
        edges.push((n - 1, 0));
    }
    Graph::from_edge_pairs(&edges, n as usize, false)
}

/// Star with hub `0` and leaves `1..n`.
pub fn star_graph(n: VertexId) -> Result<Graph<'static>, GraphError> {
    let edges: Vec<_> = (1..n).map(|v| (0, v)).collect();
    Graph::from_edge_pairs(&edges, n as usize, false)
}

/// Wheel with hub `0` and a rim cycle over `1..n`.
pub fn wheel_graph(n: VertexId) -> Result<Graph<'static>, GraphError> {
    let mut edges: Vec<_> = (1..n).map(|v| (0, v)).collect();
    edges.extend((2..n).map(|v| (v - 1, v)));
    if n > 3 {
        edges.push((n - 1, 1));
    }
    Graph::from_edge_pairs(&edges, n as usize, false)
}

/// Complete graph on `n` vertices.
pub fn complete_graph(n: VertexId) -> Result<Graph<'static>, GraphError> {
    let edges: Vec<_> = (0..n)
        .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
        .collect();
    Graph::from_edge_pairs(&edges, n as usize, false)
}

/// The five-vertex house: a square `0-1-3-2` with roof vertex `4` on `2` and `3`.
pub fn house_graph() -> Result<Graph<'static>, GraphError> {
    Graph::from_edge_pairs(
        &[(0, 1), (0, 2), (1, 3), (2, 3), (2, 4), (3, 4)],
        5,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(path_graph(6).unwrap().edge_count(), 5);
        assert_eq!(cycle_graph(6).unwrap().edge_count(), 6);
        assert_eq!(star_graph(6).unwrap().edge_count(), 5);
        assert_eq!(wheel_graph(6).unwrap().edge_count(), 10);
        assert_eq!(complete_graph(5).unwrap().edge_count(), 10);
        assert_eq!(house_graph().unwrap().edge_count(), 6);
    }

    #[test]
    fn house_matches_reference_layout() {
        let g = house_graph().unwrap();
        assert_eq!(g.forward().indptr(), &[0, 2, 4, 7, 10, 12]);
        assert_eq!(g.forward().indices(), &[1, 2, 0, 3, 0, 3, 4, 1, 2, 4, 2, 3]);
    }

    #[test]
    fn degenerate_sizes() {
        assert_eq!(path_graph(0).unwrap().vertex_count(), 0);
        assert_eq!(cycle_graph(2).unwrap().edge_count(), 1);
        assert_eq!(wheel_graph(1).unwrap().edge_count(), 0);
    }
}
