//! Branded atomic bitsets.
//!
//! A dense, word-packed visited set. Bits are only ever set during a traversal;
//! concurrent attempts to set the same bit are arbitrated by a compare-and-swap
//! on the containing word, so exactly one caller observes success.

use core::sync::atomic::Ordering;

use super::AtomicWord;
use crate::token::{GhostToken, InvariantLifetime};

/// Storage word of the bitset.
pub type Word = u64;

/// Number of bits per storage word.
pub const WORD_BITS: usize = Word::BITS as usize;

/// A branded, word-packed atomic bitset.
pub struct AtomicBitset<'brand> {
    bits: usize,
    words: Box<[AtomicWord]>,
    _brand: InvariantLifetime<'brand>,
}

impl<'brand> AtomicBitset<'brand> {
    /// Creates a new bitset with `bits` bits, all cleared.
    pub fn new(token: &GhostToken<'brand>, bits: usize) -> Self {
        Self::with_brand(token.brand(), bits)
    }

    fn with_brand(brand: InvariantLifetime<'brand>, bits: usize) -> Self {
        let words = (0..bits.div_ceil(WORD_BITS))
            .map(|_| AtomicWord::new(0))
            .collect();
        Self {
            bits,
            words,
            _brand: brand,
        }
    }

    /// Number of bits.
    #[inline]
    pub fn len_bits(&self) -> usize {
        self.bits
    }

    /// Number of storage words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Clears all bits.
    pub fn clear_all(&self) {
        for w in self.words.iter() {
            w.store(0, Ordering::Relaxed);
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    /// Returns whether `bit` is set.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn is_set(&self, bit: usize) -> bool {
        let (word, mask) = self.locate(bit);
        (self.words[word].load(Ordering::Acquire) & mask) != 0
    }

    /// Atomically sets `bit` if it is clear.
    ///
    /// Returns `true` iff this call performed the set. The CAS is retried only
    /// while another writer changes the same word; once the bit is observed set
    /// the call returns `false` without writing.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn try_test_and_set(&self, bit: usize) -> bool {
        let (word, mask) = self.locate(bit);
        let slot = &self.words[word];
        Self::set_from(slot, slot.load(Ordering::Relaxed), mask)
    }

    /// Loads the word containing `bit`.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn load_word(&self, bit: usize) -> Word {
        let (word, _) = self.locate(bit);
        self.words[word].load(Ordering::Relaxed)
    }

    /// Loads the words containing four bits at once.
    ///
    /// Issuing the four loads back to back lets them overlap before the
    /// dependent compare-and-swaps in [`try_set_with_word`](Self::try_set_with_word).
    ///
    /// # Panics
    /// Panics if any bit is `>= len_bits()`.
    #[inline]
    pub fn load_words4(&self, a: usize, b: usize, c: usize, d: usize) -> [Word; 4] {
        [
            self.load_word(a),
            self.load_word(b),
            self.load_word(c),
            self.load_word(d),
        ]
    }

    /// Like [`try_test_and_set`](Self::try_test_and_set), starting the CAS from a
    /// previously loaded word.
    ///
    /// If `cached` is stale the CAS fails and the call falls back to a fresh
    /// load and retry, so the result is exact regardless of staleness.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn try_set_with_word(&self, cached: Word, bit: usize) -> bool {
        let (word, mask) = self.locate(bit);
        Self::set_from(&self.words[word], cached, mask)
    }

    #[inline(always)]
    fn set_from(slot: &AtomicWord, mut old: Word, mask: Word) -> bool {
        loop {
            if old & mask != 0 {
                return false;
            }
            match slot.compare_exchange(old, old | mask, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => return true,
                Err(current) => old = current,
            }
        }
    }

    #[inline(always)]
    fn locate(&self, bit: usize) -> (usize, Word) {
        assert!(bit < self.bits, "bit {bit} out of bounds for {} bits", self.bits);
        // WORD_BITS is 64, so shifts replace the division on the hot path.
        (bit >> 6, 1 << (bit & 63))
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn set_once_and_query() {
        GhostToken::new(|token| {
            let b = AtomicBitset::new(&token, 130);
            assert_eq!(b.len_bits(), 130);
            assert_eq!(b.word_count(), 3);

            assert!(!b.is_set(0));
            assert!(b.try_test_and_set(0));
            assert!(b.is_set(0));
            assert!(!b.try_test_and_set(0));

            assert!(b.try_test_and_set(129));
            assert!(b.is_set(129));
            assert_eq!(b.count_ones(), 2);

            b.clear_all();
            assert!(!b.is_set(0));
            assert!(!b.is_set(129));
            assert_eq!(b.count_ones(), 0);
        });
    }

    #[test]
    fn cached_word_paths() {
        GhostToken::new(|token| {
            let b = AtomicBitset::new(&token, 256);
            let [w1, w2, w3, w4] = b.load_words4(1, 2, 65, 200);
            assert!(b.try_set_with_word(w1, 1));
            // `w2` predates the set of bit 1, so the first CAS fails and the
            // fallback reload must still succeed.
            assert!(b.try_set_with_word(w2, 2));
            assert!(b.try_set_with_word(w3, 65));
            assert!(b.try_set_with_word(w4, 200));

            // A stale word claiming the bit is clear must not re-set it.
            assert!(!b.try_set_with_word(0, 1));
            assert_eq!(b.load_word(2) & 0b110, 0b110);
            assert_eq!(b.count_ones(), 4);
        });
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_range_bit_panics() {
        GhostToken::new(|token| {
            let b = AtomicBitset::new(&token, 10);
            b.try_test_and_set(10);
        });
    }

    #[test]
    fn empty_bitset() {
        GhostToken::new(|token| {
            let b = AtomicBitset::new(&token, 0);
            assert_eq!(b.word_count(), 0);
            assert_eq!(b.count_ones(), 0);
        });
    }
}

#[cfg(all(test, loom))]
mod loom_tests {
    use super::*;
    use loom::sync::atomic::AtomicUsize;
    use loom::sync::Arc;
    use loom::thread;

    #[test]
    fn two_threads_race_for_one_bit() {
        loom::model(|| {
            // loom threads must be 'static, so the model uses the static brand.
            let bits = Arc::new(AtomicBitset::with_brand(InvariantLifetime::new(), 64));
            let wins = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let (bits, wins) = (Arc::clone(&bits), Arc::clone(&wins));
                    thread::spawn(move || {
                        if bits.try_test_and_set(5) {
                            wins.fetch_add(1, Ordering::Relaxed);
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            assert_eq!(wins.load(Ordering::Relaxed), 1);
            assert!(bits.is_set(5));
            assert!(!bits.is_set(4));
        });
    }

    #[test]
    fn neighbouring_bits_in_one_word_both_land() {
        loom::model(|| {
            let bits = Arc::new(AtomicBitset::with_brand(InvariantLifetime::new(), 64));
            let other = Arc::clone(&bits);
            let t = thread::spawn(move || other.try_test_and_set(1));
            assert!(bits.try_test_and_set(2));
            assert!(t.join().unwrap());
            assert_eq!(bits.load_word(0), 0b110);
        });
    }
}
