//! Level-synchronous breadth-first search.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::TraversalError;
use crate::graph::Graph;
use crate::traversal::config::TraversalConfig;
use crate::traversal::engine::{check_inputs, run_levels, LevelVisitor};
use crate::traversal::stats::TraversalStats;
use crate::VertexId;

/// Level of a vertex the search never reached.
pub const UNVISITED: u32 = u32::MAX;

/// Result of [`traverse_bfs_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfsLevels {
    /// Hop distance from the source per vertex, [`UNVISITED`] if unreachable.
    pub levels: Vec<u32>,
    /// Per-level counters.
    pub stats: TraversalStats,
}

impl BfsLevels {
    /// Level of `v`, or `None` if it was not reached.
    ///
    /// # Panics
    /// Panics if `v` is not a vertex of the searched graph.
    pub fn level(&self, v: VertexId) -> Option<u32> {
        Some(self.levels[v as usize]).filter(|&l| l != UNVISITED)
    }

    /// Number of reached vertices.
    pub fn reached(&self) -> usize {
        self.levels.iter().filter(|&&l| l != UNVISITED).count()
    }
}

struct LevelLabels {
    levels: Box<[AtomicU32]>,
}

impl LevelVisitor for LevelLabels {
    #[inline]
    fn on_edge(&self, _parent: VertexId, _vertex: VertexId, _discovered: bool) {}

    #[inline]
    fn on_label(&self, vertex: VertexId, depth: u32) {
        self.levels[vertex as usize].store(depth, Ordering::Relaxed);
    }
}

/// Breadth-first levels from `source` using `workers` threads.
///
/// ```
/// use lockstep::graph::generators::cycle_graph;
///
/// let g = cycle_graph(6).unwrap();
/// assert_eq!(lockstep::traverse_bfs(&g, 0, 2).unwrap(), vec![0, 1, 2, 3, 2, 1]);
/// ```
///
/// # Errors
/// See [`traverse_bfs_with`].
pub fn traverse_bfs(
    graph: &Graph<'_>,
    source: VertexId,
    workers: usize,
) -> Result<Vec<u32>, TraversalError> {
    traverse_bfs_with(graph, source, &TraversalConfig::new(workers)).map(|r| r.levels)
}

/// Breadth-first levels from `source` under an explicit configuration.
///
/// # Errors
/// - [`TraversalError::SourceOutOfRange`] if `source` is not a vertex.
/// - [`TraversalError::InvalidConfig`] if `config` fails validation.
/// - [`TraversalError::CorruptGraph`] if an adjacency row names a vertex that
///   does not exist.
pub fn traverse_bfs_with(
    graph: &Graph<'_>,
    source: VertexId,
    config: &TraversalConfig,
) -> Result<BfsLevels, TraversalError> {
    check_inputs(graph, source, config)?;
    let labels = LevelLabels {
        levels: (0..graph.vertex_count())
            .map(|_| AtomicU32::new(UNVISITED))
            .collect(),
    };
    labels.levels[source as usize].store(0, Ordering::Relaxed);

    let stats = run_levels(graph, source, config, &labels)?;
    let levels = labels
        .levels
        .into_vec()
        .into_iter()
        .map(AtomicU32::into_inner)
        .collect();
    Ok(BfsLevels { levels, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators;

    #[test]
    fn path_levels_are_hop_counts() {
        let g = generators::path_graph(6).unwrap();
        assert_eq!(traverse_bfs(&g, 0, 1).unwrap(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(traverse_bfs(&g, 3, 4).unwrap(), vec![3, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn wheel_rim_is_one_hop_from_hub() {
        let g = generators::wheel_graph(8).unwrap();
        let levels = traverse_bfs(&g, 0, 3).unwrap();
        assert_eq!(levels[0], 0);
        assert!(levels[1..].iter().all(|&l| l == 1));

        let from_rim = traverse_bfs(&g, 1, 3).unwrap();
        assert_eq!(from_rim, vec![1, 0, 1, 2, 2, 2, 2, 1]);
    }

    #[test]
    fn unreachable_vertices_stay_unvisited() {
        let g = Graph::from_edge_pairs(&[(0, 1), (2, 3)], 5, false).unwrap();
        let r = traverse_bfs_with(&g, 0, &TraversalConfig::new(2)).unwrap();
        assert_eq!(r.levels, vec![0, 1, UNVISITED, UNVISITED, UNVISITED]);
        assert_eq!(r.level(1), Some(1));
        assert_eq!(r.level(4), None);
        assert_eq!(r.reached(), 2);
        assert_eq!(r.stats.reached(), 2);
    }

    #[test]
    fn directed_search_follows_out_edges_only() {
        let g = Graph::from_edge_pairs(&[(0, 1), (1, 2), (3, 0)], 4, true).unwrap();
        assert_eq!(traverse_bfs(&g, 0, 2).unwrap(), vec![0, 1, 2, UNVISITED]);
        assert_eq!(traverse_bfs(&g, 3, 2).unwrap(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn isolated_source() {
        let g = Graph::from_edge_pairs(&[], 1, false).unwrap();
        let r = traverse_bfs_with(&g, 0, &TraversalConfig::new(4)).unwrap();
        assert_eq!(r.levels, vec![0]);
        assert_eq!(r.stats.levels.len(), 1);
        assert_eq!(r.stats.max_depth(), 0);
    }
}
