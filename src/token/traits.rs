//! Traits for abstracting over token capabilities.

use crate::token::GhostToken;

/// A token that proves membership in the `'brand` scope.
///
/// Synchronisation primitives take `&impl GhostBorrow<'brand>` so that only
/// threads running inside the owning traversal scope can rendezvous on them.
pub trait GhostBorrow<'brand> {}

impl<'brand> GhostBorrow<'brand> for GhostToken<'brand> {}
