//! Unit-weight shortest paths with parent links and path counts.
//!
//! With every edge weighing one, the level-synchronous frontier settles
//! vertices in distance order, so the engine's levels are exactly the
//! Dijkstra distances. On top of the levels this driver records a parent for
//! every reached vertex and counts how many distinct shortest paths lead to it.
//!
//! A vertex `v` at distance `d + 1` receives the path count of every neighbor
//! `u` at distance `d`. The discovering worker adds the first contribution;
//! edges from other vertices of the same frontier that lose the bitset race
//! add theirs too. Those losers are told apart from edges back to settled
//! vertices by `v`'s distance, which is still unset because distances are only
//! written in the label phase.

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::error::TraversalError;
use crate::graph::Graph;
use crate::traversal::bfs::UNVISITED;
use crate::traversal::config::TraversalConfig;
use crate::traversal::engine::{check_inputs, run_levels, LevelVisitor};
use crate::traversal::stats::TraversalStats;
use crate::VertexId;

/// Parent of a vertex the search never reached.
pub const NO_PARENT: VertexId = VertexId::MAX;

/// Result of [`traverse_dijkstra_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths {
    /// Distance from the source per vertex, [`UNVISITED`] if unreachable.
    pub distances: Vec<u32>,
    /// Predecessor on one shortest path, [`NO_PARENT`] if unreachable. The
    /// source is its own parent.
    pub parents: Vec<VertexId>,
    /// Number of distinct shortest paths from the source, `0` if unreachable.
    /// Counts wrap on overflow.
    pub path_counts: Vec<u64>,
    /// Per-level counters.
    pub stats: TraversalStats,
}

impl ShortestPaths {
    /// Distance of `v`, or `None` if it was not reached.
    ///
    /// # Panics
    /// Panics if `v` is not a vertex of the searched graph.
    pub fn distance(&self, v: VertexId) -> Option<u32> {
        Some(self.distances[v as usize]).filter(|&d| d != UNVISITED)
    }

    /// One shortest path from the source to `v`, following parent links.
    ///
    /// # Panics
    /// Panics if `v` is not a vertex of the searched graph.
    pub fn path_to(&self, v: VertexId) -> Option<Vec<VertexId>> {
        let hops = self.distance(v)?;
        let mut path = Vec::with_capacity(hops as usize + 1);
        let mut at = v;
        path.push(at);
        for _ in 0..hops {
            at = self.parents[at as usize];
            path.push(at);
        }
        path.reverse();
        Some(path)
    }
}

struct PathLabels {
    distances: Box<[AtomicU32]>,
    parents: Box<[AtomicU32]>,
    path_counts: Box<[AtomicU64]>,
}

impl PathLabels {
    fn new(vertex_count: usize) -> Self {
        Self {
            distances: (0..vertex_count).map(|_| AtomicU32::new(UNVISITED)).collect(),
            parents: (0..vertex_count).map(|_| AtomicU32::new(NO_PARENT)).collect(),
            path_counts: (0..vertex_count).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    #[inline]
    fn add_paths(&self, from: VertexId, to: VertexId) {
        let paths = self.path_counts[from as usize].load(Ordering::Relaxed);
        self.path_counts[to as usize].fetch_add(paths, Ordering::Relaxed);
    }
}

impl LevelVisitor for PathLabels {
    #[inline]
    fn on_edge(&self, parent: VertexId, vertex: VertexId, discovered: bool) {
        if discovered {
            self.parents[vertex as usize].store(parent, Ordering::Relaxed);
            self.add_paths(parent, vertex);
        } else if self.distances[vertex as usize].load(Ordering::Relaxed) == UNVISITED {
            self.add_paths(parent, vertex);
        }
    }

    #[inline]
    fn on_label(&self, vertex: VertexId, depth: u32) {
        self.distances[vertex as usize].store(depth, Ordering::Relaxed);
    }
}

/// Shortest paths from `source` using `workers` threads.
///
/// # Errors
/// See [`traverse_dijkstra_with`].
pub fn traverse_dijkstra(
    graph: &Graph<'_>,
    source: VertexId,
    workers: usize,
) -> Result<ShortestPaths, TraversalError> {
    traverse_dijkstra_with(graph, source, &TraversalConfig::new(workers))
}

/// Shortest paths from `source` under an explicit configuration.
///
/// ```
/// use lockstep::graph::generators::house_graph;
///
/// let g = house_graph().unwrap();
/// let sp = lockstep::traverse_dijkstra(&g, 0, 2).unwrap();
/// assert_eq!(sp.distances, vec![0, 1, 1, 2, 2]);
/// assert_eq!(sp.path_counts, vec![1, 1, 1, 2, 1]);
/// ```
///
/// # Errors
/// Same as [`traverse_bfs_with`](crate::traverse_bfs_with).
pub fn traverse_dijkstra_with(
    graph: &Graph<'_>,
    source: VertexId,
    config: &TraversalConfig,
) -> Result<ShortestPaths, TraversalError> {
    check_inputs(graph, source, config)?;
    let labels = PathLabels::new(graph.vertex_count());
    let s = source as usize;
    labels.distances[s].store(0, Ordering::Relaxed);
    labels.parents[s].store(source, Ordering::Relaxed);
    labels.path_counts[s].store(1, Ordering::Relaxed);

    let stats = run_levels(graph, source, config, &labels)?;
    let PathLabels {
        distances,
        parents,
        path_counts,
    } = labels;
    Ok(ShortestPaths {
        distances: distances.into_vec().into_iter().map(AtomicU32::into_inner).collect(),
        parents: parents.into_vec().into_iter().map(AtomicU32::into_inner).collect(),
        path_counts: path_counts.into_vec().into_iter().map(AtomicU64::into_inner).collect(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators;

    #[test]
    fn house_counts_tied_predecessors() {
        let g = generators::house_graph().unwrap();
        for workers in [1, 2, 5] {
            let sp = traverse_dijkstra(&g, 0, workers).unwrap();
            assert_eq!(sp.distances, vec![0, 1, 1, 2, 2]);
            assert_eq!(sp.path_counts, vec![1, 1, 1, 2, 1]);
            assert_eq!(sp.parents[0], 0);
            assert_eq!(sp.parents[4], 2);
            assert!([1, 2].contains(&sp.parents[3]));
        }
    }

    #[test]
    fn even_cycle_has_two_paths_to_the_antipode() {
        let g = generators::cycle_graph(6).unwrap();
        let sp = traverse_dijkstra(&g, 0, 3).unwrap();
        assert_eq!(sp.distances, vec![0, 1, 2, 3, 2, 1]);
        assert_eq!(sp.path_counts, vec![1, 1, 1, 2, 1, 1]);
        let path = sp.path_to(3).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!((path[0], path[3]), (0, 3));
    }

    #[test]
    fn unreachable_vertices_have_no_parent_or_paths() {
        let g = Graph::from_edge_pairs(&[(0, 1), (2, 3)], 4, false).unwrap();
        let sp = traverse_dijkstra(&g, 1, 2).unwrap();
        assert_eq!(sp.distances, vec![1, 0, UNVISITED, UNVISITED]);
        assert_eq!(sp.parents, vec![1, 1, NO_PARENT, NO_PARENT]);
        assert_eq!(sp.path_counts, vec![1, 1, 0, 0]);
        assert_eq!(sp.path_to(3), None);
        assert_eq!(sp.path_to(1), Some(vec![1]));
    }

    #[test]
    fn complete_bipartite_counts_multiply() {
        // 0 -> {1,2,3} -> {4,5} -> 6: every middle vertex reaches every sink.
        let mut edges = vec![];
        for m in 1..=3 {
            edges.push((0, m));
            edges.push((m, 4));
            edges.push((m, 5));
        }
        edges.push((4, 6));
        edges.push((5, 6));
        let g = Graph::from_edge_pairs(&edges, 7, true).unwrap();
        let sp = traverse_dijkstra(&g, 0, 4).unwrap();
        assert_eq!(sp.distances, vec![0, 1, 1, 1, 2, 2, 3]);
        assert_eq!(sp.path_counts, vec![1, 1, 1, 1, 3, 3, 6]);
    }
}
