//! Error types for graph construction and traversal.
//!
//! Construction errors never leave a partially built graph behind. Traversal
//! errors abort the whole traversal: no level or distance array is returned once
//! any worker has observed an inconsistency.

use std::io;

use thiserror::Error;

use crate::VertexId;

/// Failure while building, validating, or loading a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge endpoint or neighbor index is not a valid vertex id.
    #[error("construction failed: vertex {vertex} out of range for {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending id.
        vertex: u64,
        /// Declared number of vertices.
        vertex_count: usize,
    },

    /// Forward and backward adjacency disagree on the number of vertices.
    #[error("construction failed: forward adjacency has {forward} vertices, backward has {backward}")]
    VertexCountMismatch {
        /// Vertex count of the forward matrix.
        forward: usize,
        /// Vertex count of the backward matrix.
        backward: usize,
    },

    /// Forward and backward adjacency disagree on the number of stored edges.
    #[error("construction failed: forward adjacency has {forward} entries, backward has {backward}")]
    EdgeCountMismatch {
        /// Entry count of the forward matrix.
        forward: usize,
        /// Entry count of the backward matrix.
        backward: usize,
    },

    /// Source and destination arrays have different lengths.
    #[error("construction failed: {sources} sources but {destinations} destinations")]
    LengthMismatch {
        /// Length of the source array.
        sources: usize,
        /// Length of the destination array.
        destinations: usize,
    },

    /// The index-pointer array does not describe a valid CSR layout.
    #[error("construction failed: malformed index pointer: {reason}")]
    MalformedIndptr {
        /// What is wrong with it.
        reason: String,
    },

    /// Row/column pairs handed to a sorted-input constructor were not sorted.
    #[error("construction failed: input pairs are not sorted at position {position}")]
    UnsortedInput {
        /// First position that breaks the ordering.
        position: usize,
    },

    /// The vertex count does not fit the `u32` id space (`u32::MAX` is reserved).
    #[error("construction failed: {vertex_count} vertices exceed the id space of {max}")]
    TooManyVertices {
        /// Requested vertex count.
        vertex_count: usize,
        /// Largest supported vertex count.
        max: usize,
    },

    /// A persisted record is truncated or internally inconsistent.
    #[error("construction failed: malformed record: {reason}")]
    MalformedRecord {
        /// What is wrong with it.
        reason: String,
    },

    /// Underlying I/O failure while reading or writing a persisted graph.
    #[error("construction failed: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a traversal call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraversalError {
    /// The requested source is not a vertex of the graph.
    #[error("source vertex {vertex} out of range for {vertex_count} vertices")]
    SourceOutOfRange {
        /// The requested source.
        vertex: VertexId,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// The traversal configuration cannot be executed.
    #[error("invalid traversal configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },

    /// A neighbor id read from the adjacency is not a valid vertex.
    ///
    /// This means the adjacency handed to the engine is corrupt; the traversal
    /// is aborted rather than producing levels that may silently be wrong.
    #[error("corrupt graph: neighbor {vertex} of {parent} out of range for {vertex_count} vertices")]
    CorruptGraph {
        /// Vertex whose adjacency row holds the bad id.
        parent: VertexId,
        /// The out-of-range id.
        vertex: VertexId,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// More vertices were discovered in one level than the frontier can hold.
    #[error("frontier overflow: capacity {capacity} exhausted")]
    FrontierOverflow {
        /// Capacity of the frontier buffer.
        capacity: usize,
    },
}
