//! Immutable sparse graphs in compressed sparse row form.
//!
//! A [`Graph`] pairs a forward (out-edge) and backward (in-edge) [`CsrMatrix`].
//! Storage is either owned or borrowed from a memory-mapped file, see
//! [`persistence`].

pub mod csr;
pub mod generators;
pub mod persistence;
pub mod sparse_graph;

pub use csr::CsrMatrix;
pub use persistence::MappedGraph;
pub use sparse_graph::{Graph, MAX_VERTICES};
