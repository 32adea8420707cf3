//! `SpinBarrier`: a token-gated, counter-based rendezvous with an elected leader.
//!
//! Each [`Phase`] owns a countdown initialised to the number of parties. Every
//! arriving worker decrements it; the worker that drives it to zero becomes the
//! leader, runs the serial bookkeeping for the transition, restores the counter,
//! and releases the others by advancing the phase's generation. Followers spin
//! (optionally yielding) until the generation moves.
//!
//! The decrement is an acquire-release RMW and the release is a release store
//! observed with acquire loads, so everything written before any worker arrived
//! is visible to every worker after the barrier, including the leader's
//! bookkeeping.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_utils::{Backoff, CachePadded};
use thiserror::Error;

use crate::token::{GhostBorrow, GhostToken, InvariantLifetime};

/// The two alternating rendezvous points of a traversal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// All workers finished expanding the current frontier.
    Process = 0,
    /// All workers finished sorting and labeling the next frontier.
    Label = 1,
}

/// How a worker left the barrier.
#[derive(Debug, PartialEq, Eq)]
pub enum Arrival<R> {
    /// This worker arrived last and ran the bookkeeping closure.
    Leader(R),
    /// Another worker led this rendezvous.
    Follower,
}

impl<R> Arrival<R> {
    /// Returns `true` for the elected leader.
    pub fn is_leader(&self) -> bool {
        matches!(self, Arrival::Leader(_))
    }
}

/// A party abandoned the barrier; waiting would never complete.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("spin barrier poisoned by an aborted worker")]
pub struct BarrierPoisoned;

/// A spin-waiting barrier for a fixed set of parties.
pub struct SpinBarrier<'brand> {
    remaining: [CachePadded<AtomicUsize>; 2],
    generation: [CachePadded<AtomicUsize>; 2],
    parties: usize,
    yield_when_waiting: bool,
    poisoned: AtomicBool,
    _brand: InvariantLifetime<'brand>,
}

impl<'brand> SpinBarrier<'brand> {
    /// Creates a barrier for `parties` workers.
    ///
    /// With `yield_when_waiting` the spin loop falls back to
    /// `std::thread::yield_now` after a short busy-wait, which matters when there
    /// are more workers than cores.
    ///
    /// # Panics
    /// Panics if `parties == 0`.
    pub fn new(token: &GhostToken<'brand>, parties: usize, yield_when_waiting: bool) -> Self {
        assert!(parties != 0, "parties must be > 0");
        let counter = || CachePadded::new(AtomicUsize::new(parties));
        let epoch = || CachePadded::new(AtomicUsize::new(0));
        Self {
            remaining: [counter(), counter()],
            generation: [epoch(), epoch()],
            parties,
            yield_when_waiting,
            poisoned: AtomicBool::new(false),
            _brand: token.brand(),
        }
    }

    /// Number of workers that must arrive per rendezvous.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Arrives at `phase` and waits for all parties.
    ///
    /// The last worker to arrive runs `leader` before anyone is released and gets
    /// its result back as [`Arrival::Leader`].
    ///
    /// # Errors
    /// Returns [`BarrierPoisoned`] if the barrier was poisoned while waiting.
    pub fn wait<R>(
        &self,
        phase: Phase,
        _token: &impl GhostBorrow<'brand>,
        leader: impl FnOnce() -> R,
    ) -> Result<Arrival<R>, BarrierPoisoned> {
        let idx = phase as usize;
        // Read before arriving: the leader cannot advance it until we have.
        let seen = self.generation[idx].load(Ordering::Acquire);

        if self.remaining[idx].fetch_sub(1, Ordering::AcqRel) == 1 {
            let out = leader();
            self.remaining[idx].store(self.parties, Ordering::Relaxed);
            self.generation[idx].fetch_add(1, Ordering::Release);
            return Ok(Arrival::Leader(out));
        }

        let backoff = Backoff::new();
        while self.generation[idx].load(Ordering::Acquire) == seen {
            if self.is_poisoned() {
                return Err(BarrierPoisoned);
            }
            if self.yield_when_waiting {
                backoff.snooze();
            } else {
                backoff.spin();
            }
        }
        Ok(Arrival::Follower)
    }

    /// Marks the barrier unusable and releases every waiter with an error.
    pub fn poison(&self) {
        self.poisoned.store(true, Ordering::Release);
    }

    /// Returns `true` once any worker has poisoned the barrier.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    /// Returns a guard that poisons the barrier if dropped during a panic.
    pub fn poison_on_unwind(&self) -> PoisonOnUnwind<'_, 'brand> {
        PoisonOnUnwind { barrier: self }
    }
}

/// Poisons its barrier when the owning worker unwinds.
pub struct PoisonOnUnwind<'b, 'brand> {
    barrier: &'b SpinBarrier<'brand>,
}

impl Drop for PoisonOnUnwind<'_, '_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.barrier.poison();
        }
    }
}
