//! Serial reference implementations shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use lockstep::{Graph, VertexId, UNVISITED};

/// Queue-based BFS levels.
pub fn serial_levels(graph: &Graph<'_>, source: VertexId) -> Vec<u32> {
    let mut levels = vec![UNVISITED; graph.vertex_count()];
    let mut queue = VecDeque::from([source]);
    levels[source as usize] = 0;
    while let Some(u) = queue.pop_front() {
        for &v in graph.out_neighbors(u) {
            if levels[v as usize] == UNVISITED {
                levels[v as usize] = levels[u as usize] + 1;
                queue.push_back(v);
            }
        }
    }
    levels
}

/// Shortest-path counts computed level by level from serial BFS levels.
pub fn serial_path_counts(graph: &Graph<'_>, source: VertexId) -> Vec<u64> {
    let levels = serial_levels(graph, source);
    let mut order: Vec<VertexId> = (0..graph.vertex_count() as VertexId)
        .filter(|&v| levels[v as usize] != UNVISITED)
        .collect();
    order.sort_by_key(|&v| levels[v as usize]);

    let mut counts = vec![0u64; graph.vertex_count()];
    counts[source as usize] = 1;
    for u in order {
        for &v in graph.out_neighbors(u) {
            if levels[v as usize] == levels[u as usize] + 1 {
                counts[v as usize] += counts[u as usize];
            }
        }
    }
    counts
}

/// Deterministic pseudo-random edge list (xorshift) for stress tests.
pub fn random_edges(vertices: u32, edges: usize, seed: u64) -> Vec<(VertexId, VertexId)> {
    let mut state = seed | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % u64::from(vertices)) as VertexId
    };
    (0..edges).map(|_| (next(), next())).collect()
}
