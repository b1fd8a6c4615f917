//! Criterion micro-benchmarks for the cache window and session stepping.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use strobe_bench::{build_graph, generate_frames, trace_source, Profile};
use strobe_core::{CycleId, FrameBatch};
use strobe_engine::{CacheWindow, InlineRefill, PlaybackConfig, PlaybackSession};

/// Benchmark: replace the window with a 100-frame batch.
fn bench_window_load(c: &mut Criterion) {
    let profile = Profile {
        cycles: 100,
        ..Profile::reference(1)
    };
    let frames: Vec<_> = generate_frames(&profile).into_iter().map(Arc::new).collect();
    let batch = FrameBatch::starting_at(CycleId(5_000), frames).unwrap();
    let mut window = CacheWindow::new();

    c.bench_function("window_load_100", |b| {
        b.iter_batched(
            || batch.clone(),
            |batch| window.load(batch).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: cache lookups and the prefetch check across a full window.
fn bench_window_lookup(c: &mut Criterion) {
    let profile = Profile {
        cycles: 100,
        ..Profile::reference(1)
    };
    let frames: Vec<_> = generate_frames(&profile).into_iter().map(Arc::new).collect();
    let mut window = CacheWindow::new();
    window
        .load(FrameBatch::starting_at(CycleId(0), frames).unwrap())
        .unwrap();

    c.bench_function("window_get_and_exhaustion_check_100", |b| {
        b.iter(|| {
            for cycle in 0..100u64 {
                black_box(window.get(CycleId(cycle)).is_ok());
                black_box(window.is_near_exhaustion(Some(CycleId(cycle)), 100, 0.25));
            }
        });
    });
}

/// Benchmark: play 1000 cycles forward through a session, refills included.
fn bench_session_playthrough(c: &mut Criterion) {
    let profile = Profile::reference(42);
    let graph = build_graph(&profile).unwrap();
    let source = trace_source(&profile).unwrap();

    c.bench_function("session_play_1000_cycles_10k", |b| {
        b.iter_batched(
            || {
                let mut s = PlaybackSession::new(
                    graph.clone(),
                    InlineRefill::new(source.clone()),
                    PlaybackConfig::default(),
                )
                .unwrap();
                s.prime().unwrap();
                s
            },
            |mut s| {
                loop {
                    s.pump();
                    if s.step(1).is_err() {
                        break;
                    }
                }
                black_box(s.current())
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_window_load,
    bench_window_lookup,
    bench_session_playthrough
);
criterion_main!(benches);
