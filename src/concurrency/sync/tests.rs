use super::*;
use crate::token::GhostToken;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[test]
fn single_party_always_leads() {
    GhostToken::new(|token| {
        let barrier = SpinBarrier::new(&token, 1, false);
        for round in 0..3 {
            let arrival = barrier.wait(Phase::Process, &token, || round).unwrap();
            assert_eq!(arrival, Arrival::Leader(round));
            assert!(barrier.wait(Phase::Label, &token, || ()).unwrap().is_leader());
        }
    });
}

#[test]
fn one_leader_per_rendezvous() {
    const WORKERS: usize = 4;
    const ROUNDS: usize = 200;

    GhostToken::new(|token| {
        let barrier = SpinBarrier::new(&token, WORKERS, true);
        let leaders = AtomicUsize::new(0);
        let bookkeeping = AtomicUsize::new(0);
        let arrived = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..WORKERS {
                s.spawn(|| {
                    for round in 0..ROUNDS {
                        arrived.fetch_add(1, Ordering::Relaxed);
                        let phase = if round % 2 == 0 { Phase::Process } else { Phase::Label };
                        let arrival = barrier
                            .wait(phase, &token, || {
                                // Every party has arrived before the leader runs.
                                assert_eq!(arrived.load(Ordering::Relaxed), (round + 1) * WORKERS);
                                bookkeeping.fetch_add(1, Ordering::Relaxed);
                            })
                            .unwrap();
                        if arrival.is_leader() {
                            leaders.fetch_add(1, Ordering::Relaxed);
                        }
                        // The leader's bookkeeping is visible once released.
                        assert!(bookkeeping.load(Ordering::Relaxed) > round);
                    }
                });
            }
        });

        assert_eq!(leaders.load(Ordering::Relaxed), ROUNDS);
        assert_eq!(bookkeeping.load(Ordering::Relaxed), ROUNDS);
    });
}

#[test]
fn poison_releases_waiters() {
    GhostToken::new(|token| {
        let barrier = SpinBarrier::new(&token, 3, true);
        thread::scope(|s| {
            let waiter = s.spawn(|| barrier.wait(Phase::Process, &token, || ()));
            thread::sleep(Duration::from_millis(20));
            barrier.poison();
            assert_eq!(waiter.join().unwrap(), Err(BarrierPoisoned));
        });
    });
}

#[test]
fn panicking_worker_poisons() {
    GhostToken::new(|token| {
        let barrier = SpinBarrier::new(&token, 2, true);
        thread::scope(|s| {
            let crashed = s.spawn(|| {
                let _guard = barrier.poison_on_unwind();
                panic!("worker failed");
            });
            assert!(crashed.join().is_err());
            assert_eq!(
                barrier.wait(Phase::Label, &token, || ()),
                Err(BarrierPoisoned)
            );
        });
    });
}
