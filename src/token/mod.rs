//! Branding tokens that scope per-traversal scratch state.
//!
//! A `GhostToken<'brand>` is a zero-sized capability created by
//! [`GhostToken::new`]. Every traversal call opens a fresh token scope and
//! allocates its bitset, frontiers, and phase barrier under that brand, so
//! scratch state from one traversal can never be handed to the barrier or
//! frontier of another.
//!
//! ## Core invariant (linearity)
//!
//! `GhostToken<'brand>` is intentionally **not** `Copy`/`Clone`. Workers share
//! `&GhostToken<'brand>`; only the creating scope owns the token itself.

/// Traits defining token capabilities.
pub mod traits;

pub use traits::GhostBorrow;

use core::marker::PhantomData;

/// A marker type that is invariant in its lifetime parameter `'id`.
///
/// Invariance keeps the compiler from unifying two distinct brands by shrinking
/// one of them.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvariantLifetime<'id>(PhantomData<fn(&'id ()) -> &'id ()>);

impl<'id> InvariantLifetime<'id> {
    /// Creates a new invariant lifetime marker.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// A zero-sized token naming one traversal scope.
#[derive(Debug)]
pub struct GhostToken<'brand>(InvariantLifetime<'brand>);

impl<'brand> GhostToken<'brand> {
    /// Creates a new token and executes a closure with it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lockstep::GhostToken;
    ///
    /// let words = GhostToken::new(|token| {
    ///     let bits = lockstep::AtomicBitset::new(&token, 130);
    ///     bits.word_count()
    /// });
    /// assert_eq!(words, 3);
    /// ```
    pub fn new<F, R>(f: F) -> R
    where
        F: for<'new_brand> FnOnce(GhostToken<'new_brand>) -> R,
    {
        f(GhostToken(InvariantLifetime::new()))
    }

    /// Returns the brand marker carried by this token.
    ///
    /// Branded structures store this marker to tie themselves to the scope.
    #[inline(always)]
    pub const fn brand(&self) -> InvariantLifetime<'brand> {
        self.0
    }
}
