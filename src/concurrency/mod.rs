//! Lock-free building blocks for level-synchronous workers.
//!
//! Everything here is allocated per traversal inside a [`GhostToken`] scope and
//! branded with it, so state from one traversal cannot be handed to the
//! workers of another.
//!
//! [`GhostToken`]: crate::GhostToken

pub mod affinity;
pub mod atomic;
pub mod frontier;
pub mod scoped;
pub mod sync;

pub use frontier::{Frontier, FrontierWriter, SENTINEL};
pub use scoped::run_workers;
pub use sync::{Phase, SpinBarrier};
