//! Criterion micro-benchmarks for painting frames onto a graph.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use strobe_bench::{build_graph, generate_frames, Profile};
use strobe_engine::{DeltaApplier, DrawMode, PaintStyle, PlaybackConfig};

fn style(mode: DrawMode) -> PaintStyle {
    PaintStyle::from_config(&PlaybackConfig {
        mode,
        ..PlaybackConfig::default()
    })
}

/// Benchmark: apply 100 consecutive frames in discrete mode (10K nodes).
fn bench_apply_discrete(c: &mut Criterion) {
    let profile = Profile::reference(42);
    let mut graph = build_graph(&profile).unwrap();
    let frames = generate_frames(&profile);
    let mut applier = DeltaApplier::new(style(DrawMode::Discrete));
    applier.prepare(&mut graph);

    c.bench_function("apply_100_frames_discrete_10k", |b| {
        b.iter(|| {
            for frame in &frames[..100] {
                black_box(applier.apply(&mut graph, frame));
            }
        });
    });
}

/// Benchmark: the same frames in heat mode (no revert pass).
fn bench_apply_heat(c: &mut Criterion) {
    let profile = Profile::reference(42);
    let mut graph = build_graph(&profile).unwrap();
    let frames = generate_frames(&profile);
    let mut applier = DeltaApplier::new(style(DrawMode::Heat));
    applier.prepare(&mut graph);

    c.bench_function("apply_100_frames_heat_10k", |b| {
        b.iter(|| {
            for frame in &frames[..100] {
                black_box(applier.apply(&mut graph, frame));
            }
        });
    });
}

/// Benchmark: whole-graph repaint on a mode toggle (10K nodes, 30K edges).
fn bench_mode_toggle(c: &mut Criterion) {
    let profile = Profile::reference(7);
    let graph = build_graph(&profile).unwrap();

    c.bench_function("mode_toggle_repaint_10k", |b| {
        b.iter_batched(
            || (graph.clone(), DeltaApplier::new(style(DrawMode::Discrete))),
            |(mut g, mut applier)| {
                applier.set_mode(&mut g, DrawMode::Heat);
                black_box(g)
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: one stress-profile frame (1000 activations over 100K nodes).
fn bench_apply_stress(c: &mut Criterion) {
    let profile = Profile {
        cycles: 10,
        ..Profile::stress(3)
    };
    let mut graph = build_graph(&profile).unwrap();
    let frames = generate_frames(&profile);
    let mut applier = DeltaApplier::new(style(DrawMode::Discrete));
    applier.prepare(&mut graph);

    c.bench_function("apply_frame_discrete_100k", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(applier.apply(&mut graph, &frames[i % frames.len()]));
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_apply_discrete,
    bench_apply_heat,
    bench_mode_toggle,
    bench_apply_stress
);
criterion_main!(benches);
