//! Phase synchronisation for level-synchronous workers.
//!
//! Workers are pinned one per core and phases last milliseconds, so waiting is
//! done by polling atomics rather than parking on OS primitives.

pub mod spin_barrier;

pub use spin_barrier::{Arrival, BarrierPoisoned, Phase, PoisonOnUnwind, SpinBarrier};

#[cfg(test)]
mod tests;
