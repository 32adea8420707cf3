//! Parallel level-synchronous traversals over a [`Graph`](crate::graph::Graph).
//!
//! [`traverse_bfs`] returns hop distances; [`traverse_dijkstra`] adds parent
//! links and shortest-path counts for unit edge weights. Both run the same
//! engine: a fixed team of scoped worker threads that expand one frontier per
//! level and meet at a spin barrier between phases.

pub mod bfs;
pub mod config;
pub mod dijkstra;
mod engine;
pub mod stats;

pub use bfs::{traverse_bfs, traverse_bfs_with, BfsLevels, UNVISITED};
pub use config::TraversalConfig;
pub use dijkstra::{traverse_dijkstra, traverse_dijkstra_with, ShortestPaths, NO_PARENT};
pub use stats::{LevelStats, TraversalStats};
