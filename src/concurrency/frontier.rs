//! Block-claimed frontier buffers for level-synchronous traversal.
//!
//! A frontier is a fixed-capacity vertex buffer with one shared cursor. While a
//! level is being expanded the buffer plays one of two roles:
//!
//! - **current**: read-only; workers drain it by claiming `read_block`-sized
//!   ranges from the cursor.
//! - **next**: write-only; workers claim `write_block`-sized ranges and fill them
//!   privately, so the cursor is touched once per block rather than once per
//!   vertex.
//!
//! A worker's last block is usually only partly filled. [`FrontierWriter::finish`]
//! pads the remainder with [`SENTINEL`], which sorts after every real id, so
//! consumers can skip slack without per-block length metadata.

use core::ops::Range;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::error::TraversalError;
use crate::token::{GhostToken, InvariantLifetime};
use crate::VertexId;

/// Reserved id marking unused slots of a frontier.
pub const SENTINEL: VertexId = VertexId::MAX;

/// A branded, block-claimed vertex buffer.
pub struct Frontier<'brand> {
    data: Box<[AtomicU32]>,
    head: CachePadded<AtomicUsize>,
    len: AtomicUsize,
    read_block: usize,
    write_block: usize,
    _brand: InvariantLifetime<'brand>,
}

impl<'brand> Frontier<'brand> {
    /// Creates an empty frontier able to hold `capacity` slots.
    ///
    /// # Panics
    /// Panics if either block size is zero.
    pub fn new(
        token: &GhostToken<'brand>,
        capacity: usize,
        read_block: usize,
        write_block: usize,
    ) -> Self {
        assert!(read_block != 0, "read_block must be > 0");
        assert!(write_block != 0, "write_block must be > 0");
        let data = (0..capacity).map(|_| AtomicU32::new(SENTINEL)).collect();
        Self {
            data,
            head: CachePadded::new(AtomicUsize::new(0)),
            len: AtomicUsize::new(0),
            read_block,
            write_block,
            _brand: token.brand(),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of readable slots (real vertices plus sentinel slack).
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns `true` if there is nothing to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the id stored in slot `index`.
    ///
    /// # Panics
    /// Panics if `index >= capacity()`.
    #[inline]
    pub fn get(&self, index: usize) -> VertexId {
        self.data[index].load(Ordering::Relaxed)
    }

    /// Real vertices in the readable range, skipping sentinel slack.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.data[..self.len()]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .filter(|&v| v != SENTINEL)
    }

    /// Replaces the contents with `vertices` and makes them readable.
    ///
    /// Must not race with readers or writers.
    ///
    /// # Panics
    /// Panics if `vertices` does not fit.
    pub fn seed(&self, vertices: &[VertexId]) {
        assert!(
            vertices.len() <= self.capacity(),
            "seed of {} vertices exceeds capacity {}",
            vertices.len(),
            self.capacity()
        );
        for (slot, &v) in self.data.iter().zip(vertices) {
            slot.store(v, Ordering::Relaxed);
        }
        self.head.store(0, Ordering::Relaxed);
        self.len.store(vertices.len(), Ordering::Release);
    }

    /// Claims the next range of readable slots.
    ///
    /// An empty range means this frontier is exhausted for the current level.
    #[inline]
    pub fn claim_read_block(&self) -> Range<usize> {
        let len = self.len();
        let low = self.head.fetch_add(self.read_block, Ordering::Relaxed);
        if low >= len {
            return len..len;
        }
        low..len.min(low + self.read_block)
    }

    /// Claims the next range of writable slots for exclusive use by the caller.
    ///
    /// The range is clamped to capacity; an empty range means the buffer is
    /// full.
    #[inline]
    pub fn claim_write_block(&self) -> Range<usize> {
        let cap = self.capacity();
        let low = self.head.fetch_add(self.write_block, Ordering::Relaxed);
        low.min(cap)..cap.min(low + self.write_block)
    }

    /// Starts a block-buffered writer over this frontier.
    #[inline]
    pub fn writer(&self) -> FrontierWriter<'_, 'brand> {
        FrontierWriter {
            frontier: self,
            low: 0,
            high: 0,
        }
    }

    /// Ends the write role: everything claimed so far becomes readable and the
    /// cursor rewinds for readers.
    ///
    /// Only the elected barrier leader may call this.
    pub fn seal(&self) {
        let written = self.head.swap(0, Ordering::Relaxed);
        self.len.store(written.min(self.capacity()), Ordering::Release);
    }

    /// Empties the frontier so it can take the write role again.
    ///
    /// Only the elected barrier leader may call this.
    pub fn reset_for_write(&self) {
        self.head.store(0, Ordering::Relaxed);
        self.len.store(0, Ordering::Release);
    }

    /// Sorts the slots in `range` ascending and calls `label` for every real
    /// vertex among them.
    ///
    /// `scratch` is reused across calls to avoid allocating per level. Returns
    /// the number of trailing sentinel slots in the range.
    ///
    /// Distinct workers may sort disjoint ranges concurrently.
    pub fn sort_and_scan(
        &self,
        range: Range<usize>,
        scratch: &mut Vec<VertexId>,
        mut label: impl FnMut(VertexId),
    ) -> usize {
        let slots = &self.data[range];
        scratch.clear();
        scratch.extend(slots.iter().map(|slot| slot.load(Ordering::Relaxed)));
        scratch.sort_unstable();
        for (slot, &v) in slots.iter().zip(scratch.iter()) {
            slot.store(v, Ordering::Relaxed);
        }

        let live = scratch.partition_point(|&v| v != SENTINEL);
        for &v in &scratch[..live] {
            label(v);
        }
        scratch.len() - live
    }
}

/// A worker-local writer holding one claimed block of a [`Frontier`].
pub struct FrontierWriter<'f, 'brand> {
    frontier: &'f Frontier<'brand>,
    low: usize,
    high: usize,
}

impl FrontierWriter<'_, '_> {
    /// Appends `vertex`, claiming a fresh block when the held one is full.
    ///
    /// # Errors
    /// Returns [`TraversalError::FrontierOverflow`] when no block can be claimed.
    #[inline]
    pub fn push(&mut self, vertex: VertexId) -> Result<(), TraversalError> {
        if self.low >= self.high {
            let block = self.frontier.claim_write_block();
            if block.is_empty() {
                return Err(TraversalError::FrontierOverflow {
                    capacity: self.frontier.capacity(),
                });
            }
            self.low = block.start;
            self.high = block.end;
        }
        self.frontier.data[self.low].store(vertex, Ordering::Relaxed);
        self.low += 1;
        Ok(())
    }

    /// Pads the unused tail of the held block with [`SENTINEL`].
    ///
    /// Returns the number of padded slots.
    pub fn finish(self) -> usize {
        for slot in &self.frontier.data[self.low..self.high] {
            slot.store(SENTINEL, Ordering::Relaxed);
        }
        self.high - self.low
    }
}

/// The `index`-th of `parts` contiguous, nearly equal slices of `0..len`.
#[inline]
pub fn partition(len: usize, parts: usize, index: usize) -> Range<usize> {
    let block = len.div_ceil(parts.max(1));
    let start = len.min(index * block);
    start..len.min(start + block)
}
