//! Branded scoped-thread helpers.
//!
//! Traversal workers share `&GhostToken<'brand>` for the lifetime of one
//! traversal: the token proves membership in the scope that owns the bitset,
//! frontiers, and barrier, while all mutation goes through atomics.

use std::panic;

use tracing::warn;

use crate::concurrency::affinity;
use crate::GhostToken;

/// A scoped environment that can spawn tasks using a shared `&GhostToken<'brand>`.
pub struct GhostReadScope<'scope, 'env, 'brand> {
    scope: &'scope std::thread::Scope<'scope, 'env>,
    token: &'env GhostToken<'brand>,
}

impl<'scope, 'env, 'brand> GhostReadScope<'scope, 'env, 'brand> {
    /// Spawns a scoped thread that receives `&GhostToken<'brand>`.
    #[inline]
    pub fn spawn<T, F>(&self, f: F) -> std::thread::ScopedJoinHandle<'scope, T>
    where
        T: Send + 'scope,
        F: FnOnce(&'env GhostToken<'brand>) -> T + Send + 'scope,
    {
        let t = self.token;
        self.scope.spawn(move || f(t))
    }
}

/// Runs a scoped region where `&GhostToken<'brand>` is shared with spawned threads.
#[inline]
pub fn with_read_scope<'env, 'brand, R, F>(token: &'env GhostToken<'brand>, f: F) -> R
where
    F: for<'scope> FnOnce(GhostReadScope<'scope, 'env, 'brand>) -> R,
{
    std::thread::scope(|scope| f(GhostReadScope { scope, token }))
}

/// Runs `work` on `workers` scoped threads and collects the results in worker
/// order.
///
/// With `pin` set, worker `i` is pinned to the `i`-th allowed CPU before it
/// starts; a failed pin is logged and the worker runs unpinned. A panic in any
/// worker is re-raised on the calling thread after all workers have stopped.
///
/// # Panics
/// Panics if `workers == 0`, or re-raises a worker's panic.
pub fn run_workers<'brand, T, F>(
    token: &GhostToken<'brand>,
    workers: usize,
    pin: bool,
    work: F,
) -> Vec<T>
where
    T: Send,
    F: Fn(&GhostToken<'brand>, usize) -> T + Sync,
{
    assert!(workers != 0, "workers must be > 0");
    let work = &work;

    let joined: Vec<std::thread::Result<T>> = with_read_scope(token, |scope| {
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                scope.spawn(move |t| {
                    if pin {
                        if let Err(err) = affinity::pin_current_thread(id) {
                            warn!(worker = id, error = %err, "failed to pin worker thread");
                        }
                    }
                    work(t, id)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    joined
        .into_iter()
        .map(|r| r.unwrap_or_else(|payload| panic::resume_unwind(payload)))
        .collect()
}
