//! # `lockstep` - Level-Synchronous Parallel Graph Traversal
//!
//! Breadth-first search and unit-weight shortest paths over large sparse
//! graphs, run by a fixed team of threads that advance one frontier level at a
//! time without locks.
//!
//! ## Architecture
//!
//! - **Graphs** ([`graph`]): immutable forward/backward CSR adjacency, owned or
//!   borrowed zero-copy from a memory-mapped file.
//! - **Atomic visited set** ([`AtomicBitset`]): one bit per vertex; a
//!   compare-and-swap decides the unique discoverer of every vertex.
//! - **Frontiers** ([`concurrency::frontier`]): fixed buffers claimed in blocks,
//!   padded with [`SENTINEL`] so partly filled blocks need no bookkeeping.
//! - **Spin barrier** ([`concurrency::sync`]): two alternating rendezvous per
//!   level; the last worker to arrive is elected to do the serial work.
//! - **Drivers** ([`traversal`]): BFS levels, and distances with parents and
//!   shortest-path counts.
//!
//! All per-traversal state is created inside a [`GhostToken`] scope and branded
//! with its lifetime, so buffers and barriers of one traversal can never be
//! mixed up with those of another.
//!
//! ## Example
//!
//! ```rust
//! use lockstep::{traverse_bfs, Graph};
//!
//! let g = Graph::from_edge_pairs(&[(0, 1), (1, 2), (2, 3)], 4, false).unwrap();
//! assert_eq!(traverse_bfs(&g, 0, 2).unwrap(), vec![0, 1, 2, 3]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod error;
pub mod graph;
pub mod token;
pub mod traversal;

/// Dense vertex identifier. `VertexId::MAX` is reserved.
pub type VertexId = u32;

pub use concurrency::atomic::AtomicBitset;
pub use concurrency::frontier::SENTINEL;
pub use error::{GraphError, TraversalError};
pub use graph::{CsrMatrix, Graph, MappedGraph};
pub use token::GhostToken;
pub use traversal::{
    traverse_bfs, traverse_bfs_with, traverse_dijkstra, traverse_dijkstra_with, BfsLevels,
    ShortestPaths, TraversalConfig, TraversalStats, NO_PARENT, UNVISITED,
};

const _: () = {
    use core::mem;

    // Tokens are ZSTs.
    assert!(mem::size_of::<GhostToken<'static>>() == 0);

    // The reserved id doubles as the frontier pad and the unset label.
    assert!(SENTINEL == UNVISITED && SENTINEL == NO_PARENT);
};
