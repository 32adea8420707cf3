use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use lockstep::{AtomicBitset, GhostToken};

#[test]
fn exactly_one_thread_wins_each_bit() {
    const THREADS: usize = 8;
    const BITS: usize = 4_096;

    GhostToken::new(|token| {
        let bits = AtomicBitset::new(&token, BITS);
        let wins = AtomicUsize::new(0);

        thread::scope(|s| {
            for t in 0..THREADS {
                let (bits, wins) = (&bits, &wins);
                s.spawn(move || {
                    // Threads sweep in different orders to collide on words.
                    for i in 0..BITS {
                        let bit = if t % 2 == 0 { i } else { BITS - 1 - i };
                        if bits.try_test_and_set(bit) {
                            wins.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(wins.load(Ordering::Relaxed), BITS);
        assert_eq!(bits.count_ones(), BITS);
    });
}

#[test]
fn stale_cached_words_still_set_once() {
    const THREADS: usize = 6;

    GhostToken::new(|token| {
        let bits = AtomicBitset::new(&token, 256);
        let wins = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let (bits, wins) = (&bits, &wins);
                s.spawn(move || {
                    for base in (0..256).step_by(4) {
                        let words = bits.load_words4(base, base + 1, base + 2, base + 3);
                        for (k, w) in words.into_iter().enumerate() {
                            if bits.try_set_with_word(w, base + k) {
                                wins.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                });
            }
        });

        assert_eq!(wins.load(Ordering::Relaxed), 256);
    });
}
