//! Tuning knobs for a traversal call.

use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::TraversalError;

/// Parameters of one traversal.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use lockstep::TraversalConfig;
///
/// let config = TraversalConfig::default().with_workers(4).with_pin_threads(true);
/// assert_eq!(config.workers, 4);
/// assert_eq!(config.read_block, TraversalConfig::DEFAULT_READ_BLOCK);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Number of worker threads; must be at least 1.
    pub workers: usize,
    /// Frontier slots a worker claims per read.
    pub read_block: usize,
    /// Frontier slots a worker claims per write.
    pub write_block: usize,
    /// Pin worker `i` to the `i`-th CPU in the process affinity mask.
    pub pin_threads: bool,
    /// Let barrier waiters yield to the scheduler after a short spin.
    pub yield_when_waiting: bool,
}

impl TraversalConfig {
    /// Default number of slots per read claim.
    pub const DEFAULT_READ_BLOCK: usize = 256;
    /// Default number of slots per write claim.
    pub const DEFAULT_WRITE_BLOCK: usize = 256;

    /// A default configuration with `workers` threads.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Sets the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the read claim size.
    #[must_use]
    pub fn with_read_block(mut self, read_block: usize) -> Self {
        self.read_block = read_block;
        self
    }

    /// Sets the write claim size.
    #[must_use]
    pub fn with_write_block(mut self, write_block: usize) -> Self {
        self.write_block = write_block;
        self
    }

    /// Enables or disables pinning workers to CPUs.
    #[must_use]
    pub fn with_pin_threads(mut self, pin: bool) -> Self {
        self.pin_threads = pin;
        self
    }

    /// Enables or disables yielding while waiting at a barrier.
    #[must_use]
    pub fn with_yield_when_waiting(mut self, yield_when_waiting: bool) -> Self {
        self.yield_when_waiting = yield_when_waiting;
        self
    }

    /// Checks that the configuration can be executed.
    ///
    /// # Errors
    /// Returns [`TraversalError::InvalidConfig`] for a zero worker count or a
    /// zero block size.
    pub fn validate(&self) -> Result<(), TraversalError> {
        let reason = if self.workers == 0 {
            "workers must be at least 1"
        } else if self.read_block == 0 {
            "read_block must be at least 1"
        } else if self.write_block == 0 {
            "write_block must be at least 1"
        } else {
            return Ok(());
        };
        Err(TraversalError::InvalidConfig {
            reason: reason.to_owned(),
        })
    }

    /// Slots each frontier needs for a graph of `vertex_count` vertices.
    ///
    /// Every vertex enters a frontier at most once per traversal and each
    /// worker leaves at most one partly filled block per level.
    ///
    /// # Errors
    /// Returns [`TraversalError::InvalidConfig`] if the size overflows `usize`.
    pub(crate) fn frontier_capacity(&self, vertex_count: usize) -> Result<usize, TraversalError> {
        self.workers
            .checked_mul(self.write_block)
            .and_then(|slack| slack.checked_add(vertex_count))
            .ok_or_else(|| TraversalError::InvalidConfig {
                reason: format!(
                    "{} workers x {} slot blocks overflow the frontier size",
                    self.workers, self.write_block
                ),
            })
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
            read_block: Self::DEFAULT_READ_BLOCK,
            write_block: Self::DEFAULT_WRITE_BLOCK,
            pin_threads: false,
            yield_when_waiting: true,
        }
    }
}
