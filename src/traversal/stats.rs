//! Per-level counters collected by the barrier leader.

use serde::{Deserialize, Serialize};

/// What one level of a traversal produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    /// Depth assigned to the vertices discovered in this level.
    pub depth: u32,
    /// Vertices discovered.
    pub discovered: usize,
    /// Sentinel slots left in the frontier by partly filled write blocks.
    pub slack: usize,
}

/// Summary of a completed traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Worker threads used.
    pub workers: usize,
    /// One entry per expanded level, in depth order. The final, empty level is
    /// included.
    pub levels: Vec<LevelStats>,
}

impl TraversalStats {
    /// Number of vertices reached, including the source.
    pub fn reached(&self) -> usize {
        1 + self.levels.iter().map(|l| l.discovered).sum::<usize>()
    }

    /// Largest depth at which any vertex was discovered.
    pub fn max_depth(&self) -> u32 {
        self.levels
            .iter()
            .filter(|l| l.discovered > 0)
            .map(|l| l.depth)
            .max()
            .unwrap_or(0)
    }

    /// Total sentinel slots written across all levels.
    pub fn total_slack(&self) -> usize {
        self.levels.iter().map(|l| l.slack).sum()
    }
}
