//! Criterion micro-benchmarks for the trace codec.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strobe_bench::{generate_frames, record_trace, Profile};
use strobe_core::CycleId;
use strobe_trace::codec::{decode_frame, encode_frame};
use strobe_trace::TraceSource;

/// Benchmark: encode one frame with 100 activations.
fn bench_encode_frame(c: &mut Criterion) {
    let frame = generate_frames(&Profile {
        cycles: 1,
        ..Profile::reference(3)
    })
    .remove(0);

    c.bench_function("trace_encode_frame_100", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(4096);
            encode_frame(&mut buf, CycleId(42), &frame).unwrap();
            black_box(&buf);
        });
    });
}

/// Benchmark: decode the same frame.
fn bench_decode_frame(c: &mut Criterion) {
    let frame = generate_frames(&Profile {
        cycles: 1,
        ..Profile::reference(3)
    })
    .remove(0);
    let mut encoded = Vec::with_capacity(4096);
    encode_frame(&mut encoded, CycleId(42), &frame).unwrap();

    c.bench_function("trace_decode_frame_100", |b| {
        b.iter(|| {
            let entry = decode_frame(&mut encoded.as_slice()).unwrap();
            black_box(entry);
        });
    });
}

/// Benchmark: load and validate a 1000-cycle trace.
fn bench_load_trace(c: &mut Criterion) {
    let bytes = record_trace(&Profile::reference(5)).unwrap();

    c.bench_function("trace_load_1000_cycles", |b| {
        b.iter(|| black_box(TraceSource::from_reader(bytes.as_slice()).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_encode_frame,
    bench_decode_frame,
    bench_load_trace
);
criterion_main!(benches);
