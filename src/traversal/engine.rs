//! The level-synchronous worker loop shared by every traversal driver.
//!
//! Each level runs in two phases separated by [`SpinBarrier`] rendezvous:
//!
//! 1. **Process**: workers drain the current frontier in claimed blocks. Every
//!    out-neighbor is offered to the visited bitset; the worker whose
//!    test-and-set wins owns the vertex and appends it to the next frontier.
//! 2. **Label**: once the next frontier is sealed, each worker sorts one
//!    contiguous slice of it and labels every real vertex in that slice.
//!
//! The last worker to arrive at each barrier does the serial bookkeeping: seal
//! the next frontier, then record the level, swap roles, and decide
//! termination. Drivers plug in through [`LevelVisitor`]; all labeling happens
//! in the label phase, so per-vertex labels are stable while a level is being
//! processed.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::OnceLock;

use tracing::{debug, debug_span};

use crate::concurrency::atomic::AtomicBitset;
use crate::concurrency::frontier::{partition, Frontier, SENTINEL};
use crate::concurrency::scoped::run_workers;
use crate::concurrency::sync::{Arrival, Phase, SpinBarrier};
use crate::error::TraversalError;
use crate::graph::Graph;
use crate::token::GhostToken;
use crate::traversal::config::TraversalConfig;
use crate::traversal::stats::{LevelStats, TraversalStats};
use crate::VertexId;

/// Hooks a driver attaches to the engine.
///
/// Both hooks are called concurrently from every worker.
pub(crate) trait LevelVisitor: Sync {
    /// `parent` offered its out-neighbor `vertex` to the bitset. `discovered`
    /// is `true` for exactly one call per vertex: the one that set its bit.
    fn on_edge(&self, parent: VertexId, vertex: VertexId, discovered: bool);

    /// `vertex` belongs to the frontier at `depth`. Called once per vertex,
    /// during the label phase of the level that discovered it.
    fn on_label(&self, vertex: VertexId, depth: u32);
}

/// State shared by the workers of one traversal.
struct LevelSync<'brand> {
    visited: AtomicBitset<'brand>,
    frontiers: [Frontier<'brand>; 2],
    barrier: SpinBarrier<'brand>,
    depth: AtomicU32,
    slack: AtomicUsize,
    done: AtomicBool,
    failure: OnceLock<TraversalError>,
}

impl LevelSync<'_> {
    fn fail(&self, err: TraversalError) {
        // First failure wins; later ones are consequences of the abort.
        let _ = self.failure.set(err);
        self.barrier.poison();
    }
}

/// Checks a source vertex and a configuration before any thread is started.
pub(crate) fn check_inputs(
    graph: &Graph<'_>,
    source: VertexId,
    config: &TraversalConfig,
) -> Result<(), TraversalError> {
    config.validate()?;
    if source as usize >= graph.vertex_count() {
        return Err(TraversalError::SourceOutOfRange {
            vertex: source,
            vertex_count: graph.vertex_count(),
        });
    }
    Ok(())
}

/// Runs a level-synchronous traversal from `source`.
///
/// The caller labels the source itself; the engine marks it visited, seeds the
/// first frontier with it, and runs levels until no new vertex is discovered.
///
/// # Errors
/// Returns the first [`TraversalError`] any worker hit. No level is completed
/// after a failure.
pub(crate) fn run_levels<V: LevelVisitor>(
    graph: &Graph<'_>,
    source: VertexId,
    config: &TraversalConfig,
    visitor: &V,
) -> Result<TraversalStats, TraversalError> {
    check_inputs(graph, source, config)?;
    let capacity = config.frontier_capacity(graph.vertex_count())?;
    let workers = config.workers;

    let span = debug_span!("traversal", source, workers, vertices = graph.vertex_count());
    let _entered = span.enter();

    GhostToken::new(|token| {
        let sync = LevelSync {
            visited: AtomicBitset::new(&token, graph.vertex_count()),
            frontiers: [
                Frontier::new(&token, capacity, config.read_block, config.write_block),
                Frontier::new(&token, capacity, config.read_block, config.write_block),
            ],
            barrier: SpinBarrier::new(&token, workers, config.yield_when_waiting),
            depth: AtomicU32::new(0),
            slack: AtomicUsize::new(0),
            done: AtomicBool::new(false),
            failure: OnceLock::new(),
        };
        sync.visited.try_test_and_set(source as usize);
        sync.frontiers[0].seed(&[source]);

        let led = run_workers(&token, workers, config.pin_threads, |token, id| {
            let _span = span.enter();
            worker(token, id, graph, &sync, visitor)
        });

        if let Some(err) = sync.failure.into_inner() {
            return Err(err);
        }
        let mut levels: Vec<LevelStats> = led.into_iter().flatten().collect();
        levels.sort_unstable_by_key(|l| l.depth);
        Ok(TraversalStats { workers, levels })
    })
}

/// One worker's level loop. Returns the stats of the levels it led.
fn worker<'brand, V: LevelVisitor>(
    token: &GhostToken<'brand>,
    id: usize,
    graph: &Graph<'_>,
    sync: &LevelSync<'brand>,
    visitor: &V,
) -> Vec<LevelStats> {
    let _guard = sync.barrier.poison_on_unwind();
    let workers = sync.barrier.parties();
    let mut scratch = Vec::new();
    let mut led = Vec::new();

    while !sync.done.load(Ordering::Acquire) {
        let depth = sync.depth.load(Ordering::Acquire);
        let parity = depth as usize & 1;
        let current = &sync.frontiers[parity];
        let next = &sync.frontiers[parity ^ 1];

        if let Err(err) = expand(graph, sync, current, next, visitor) {
            sync.fail(err);
            return led;
        }
        if sync.barrier.wait(Phase::Process, token, || next.seal()).is_err() {
            return led;
        }

        let label = depth + 1;
        let slice = partition(next.len(), workers, id);
        let slack = next.sort_and_scan(slice, &mut scratch, |v| visitor.on_label(v, label));
        sync.slack.fetch_add(slack, Ordering::Relaxed);

        let arrival = sync.barrier.wait(Phase::Label, token, || {
            let slack = sync.slack.swap(0, Ordering::Relaxed);
            let discovered = next.len() - slack;
            debug!(depth = label, frontier = discovered, slack, "level complete");

            current.reset_for_write();
            sync.depth.store(label, Ordering::Release);
            if discovered == 0 {
                sync.done.store(true, Ordering::Release);
            }
            LevelStats {
                depth: label,
                discovered,
                slack,
            }
        });
        match arrival {
            Ok(Arrival::Leader(stats)) => led.push(stats),
            Ok(Arrival::Follower) => {}
            Err(_) => return led,
        }
    }
    led
}

/// The process phase for one worker: drain claimed blocks of `current`.
fn expand<V: LevelVisitor>(
    graph: &Graph<'_>,
    sync: &LevelSync<'_>,
    current: &Frontier<'_>,
    next: &Frontier<'_>,
    visitor: &V,
) -> Result<(), TraversalError> {
    let n = graph.vertex_count();
    let visited = &sync.visited;
    let mut writer = next.writer();

    loop {
        let block = current.claim_read_block();
        if block.is_empty() || sync.barrier.is_poisoned() {
            break;
        }
        for slot in block {
            let u = current.get(slot);
            if u == SENTINEL {
                continue;
            }
            let row = graph.out_neighbors(u);
            if let Some(&bad) = row.iter().find(|&&v| v as usize >= n) {
                return Err(TraversalError::CorruptGraph {
                    parent: u,
                    vertex: bad,
                    vertex_count: n,
                });
            }

            let mut quads = row.chunks_exact(4);
            for quad in &mut quads {
                let [a, b, c, d] = [quad[0], quad[1], quad[2], quad[3]].map(|v| v as usize);
                let words = visited.load_words4(a, b, c, d);
                for (&v, word) in quad.iter().zip(words) {
                    let won = visited.try_set_with_word(word, v as usize);
                    visitor.on_edge(u, v, won);
                    if won {
                        writer.push(v)?;
                    }
                }
            }
            for &v in quads.remainder() {
                let won = visited.try_test_and_set(v as usize);
                visitor.on_edge(u, v, won);
                if won {
                    writer.push(v)?;
                }
            }
        }
    }

    writer.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators;
    use std::sync::Mutex;

    /// Records every hook call for inspection.
    #[derive(Default)]
    struct Recorder {
        wins: Mutex<Vec<(VertexId, VertexId)>>,
        labels: Mutex<Vec<(VertexId, u32)>>,
    }

    impl LevelVisitor for Recorder {
        fn on_edge(&self, parent: VertexId, vertex: VertexId, discovered: bool) {
            if discovered {
                self.wins.lock().unwrap().push((parent, vertex));
            }
        }

        fn on_label(&self, vertex: VertexId, depth: u32) {
            self.labels.lock().unwrap().push((vertex, depth));
        }
    }

    #[test]
    fn every_reachable_vertex_is_won_and_labeled_once() {
        let g = generators::complete_graph(9).unwrap();
        for workers in [1, 3] {
            let rec = Recorder::default();
            let config = TraversalConfig::new(workers).with_write_block(2);
            let stats = run_levels(&g, 4, &config, &rec).unwrap();

            let mut won: Vec<_> = rec.wins.lock().unwrap().iter().map(|&(_, v)| v).collect();
            won.sort_unstable();
            assert_eq!(won, vec![0, 1, 2, 3, 5, 6, 7, 8]);

            let labels = rec.labels.lock().unwrap();
            assert_eq!(labels.len(), 8);
            assert!(labels.iter().all(|&(_, d)| d == 1));
            assert_eq!(stats.reached(), 9);
            assert_eq!(stats.levels.len(), 2);
            assert_eq!(stats.levels[1].discovered, 0);
        }
    }

    #[test]
    fn inputs_are_checked_before_spawning() {
        let g = generators::path_graph(3).unwrap();
        let rec = Recorder::default();
        assert_eq!(
            run_levels(&g, 3, &TraversalConfig::new(1), &rec),
            Err(TraversalError::SourceOutOfRange {
                vertex: 3,
                vertex_count: 3
            })
        );
        assert!(matches!(
            run_levels(&g, 0, &TraversalConfig::new(0), &rec),
            Err(TraversalError::InvalidConfig { .. })
        ));
        assert!(rec.labels.lock().unwrap().is_empty());
    }
}
