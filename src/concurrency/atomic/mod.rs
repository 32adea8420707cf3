//! Branded, lock-free atomic primitives for traversal state.
//!
//! Under `cfg(loom)` the word type is swapped for loom's model-checked atomic so
//! the set-once protocol can be explored exhaustively.

/// Word-packed set-once bitsets.
pub mod bitset;

pub use bitset::{AtomicBitset, Word, WORD_BITS};

#[cfg(loom)]
pub(crate) use loom::sync::atomic::AtomicU64 as AtomicWord;

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::AtomicU64 as AtomicWord;
