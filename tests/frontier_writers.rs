use std::thread;

use lockstep::concurrency::frontier::{partition, Frontier, SENTINEL};
use lockstep::GhostToken;

#[test]
fn concurrent_writers_publish_every_vertex_once() {
    const WRITERS: u32 = 6;
    const PER_WRITER: u32 = 1_000;
    const BLOCK: usize = 64;

    GhostToken::new(|token| {
        let capacity = (WRITERS * PER_WRITER) as usize + WRITERS as usize * BLOCK;
        let f = Frontier::new(&token, capacity, BLOCK, BLOCK);

        thread::scope(|s| {
            for w in 0..WRITERS {
                let f = &f;
                s.spawn(move || {
                    let mut writer = f.writer();
                    for i in 0..PER_WRITER {
                        writer.push(w * PER_WRITER + i).unwrap();
                    }
                    writer.finish();
                });
            }
        });
        f.seal();

        let mut seen: Vec<u32> = f.vertices().collect();
        seen.sort_unstable();
        let expected: Vec<u32> = (0..WRITERS * PER_WRITER).collect();
        assert_eq!(seen, expected);

        let slack = (0..f.len()).filter(|&i| f.get(i) == SENTINEL).count();
        assert_eq!(slack, f.len() - expected.len());
        assert!(slack < WRITERS as usize * BLOCK);
    });
}

#[test]
fn partitioned_sort_labels_each_vertex_once() {
    GhostToken::new(|token| {
        let f = Frontier::new(&token, 64, 8, 8);
        let mut w = f.writer();
        for v in (0..40).rev() {
            w.push(v).unwrap();
        }
        w.finish();
        f.seal();

        let mut labeled = Vec::new();
        let mut slack = 0;
        let mut scratch = Vec::new();
        for part in 0..3 {
            let range = partition(f.len(), 3, part);
            slack += f.sort_and_scan(range, &mut scratch, |v| labeled.push(v));
        }
        labeled.sort_unstable();
        assert_eq!(labeled, (0..40).collect::<Vec<_>>());
        assert_eq!(slack, f.len() - 40);
    });
}
