//! Benchmark profiles and utilities for the Strobe playback engine.
//!
//! Provides pre-built [`Profile`]s for benchmarks and the headless demo:
//!
//! - [`Profile::reference`]: 10K nodes, fan-out 3, 1000 cycles
//! - [`Profile::stress`]: 100K nodes, fan-out 4, 2000 cycles
//! - [`build_graph`], [`generate_frames`]: deterministic inputs via seed
//! - [`record_trace`], [`trace_source`]: the same input as a trace

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strobe_core::{Frame, Rgb};
use strobe_graph::{BuildError, GraphBuilder, LiveGraph};
use strobe_trace::{TraceError, TraceSource, TraceWriter};

/// Load-time colour of every generated node.
pub const IDLE: Rgb = Rgb::new(170, 170, 170);

/// Shape of a generated automaton and its activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    /// Number of nodes, named `s0..`.
    pub nodes: usize,
    /// Outgoing edges per node.
    pub fanout: usize,
    /// Number of cycles in the generated input.
    pub cycles: usize,
    /// Nodes activated per cycle.
    pub active_per_cycle: usize,
    /// Roughly one cycle in this many carries a report.
    pub report_every: u32,
    /// Seed for topology and activity.
    pub seed: u64,
}

impl Profile {
    /// 10K nodes with 100 activations per cycle.
    pub fn reference(seed: u64) -> Self {
        Self {
            nodes: 10_000,
            fanout: 3,
            cycles: 1_000,
            active_per_cycle: 100,
            report_every: 50,
            seed,
        }
    }

    /// 100K nodes with 1000 activations per cycle.
    pub fn stress(seed: u64) -> Self {
        Self {
            nodes: 100_000,
            fanout: 4,
            cycles: 2_000,
            active_per_cycle: 1_000,
            report_every: 200,
            seed,
        }
    }

    /// A small profile for demos and smoke runs.
    pub fn small(seed: u64) -> Self {
        Self {
            nodes: 64,
            fanout: 2,
            cycles: 500,
            active_per_cycle: 6,
            report_every: 40,
            seed,
        }
    }
}

fn pick(rng: &mut ChaCha8Rng, n: usize) -> usize {
    (rng.next_u64() % n.max(1) as u64) as usize
}

/// Build the profile's graph. Edge `e{i}_{j}` is the `j`th edge out of `s{i}`.
pub fn build_graph(profile: &Profile) -> Result<LiveGraph, BuildError> {
    let mut rng = ChaCha8Rng::seed_from_u64(profile.seed);
    let mut builder = GraphBuilder::new();
    for i in 0..profile.nodes {
        builder = builder.node(format!("s{i}"), IDLE);
    }
    for i in 0..profile.nodes {
        for j in 0..profile.fanout {
            let target = pick(&mut rng, profile.nodes);
            builder = builder.edge(format!("e{i}_{j}"), format!("s{i}"), format!("s{target}"));
        }
    }
    builder.build()
}

/// Generate the profile's frames.
///
/// Counts are cumulative per node. Active nodes are green; one in eight
/// activations shows a highlight colour instead so discrete mode
/// exercises both lit and unlit propagation.
pub fn generate_frames(profile: &Profile) -> Vec<Frame> {
    let mut rng = ChaCha8Rng::seed_from_u64(profile.seed ^ 0x5eed);
    let mut counts = vec![0u64; profile.nodes];
    let highlight = Rgb::new(255, 160, 0);
    (0..profile.cycles)
        .map(|cycle| {
            let mut frame = Frame::new(b'a' + (cycle % 26) as u8);
            for _ in 0..profile.active_per_cycle {
                let node = pick(&mut rng, profile.nodes);
                counts[node] += 1;
                let color = if rng.next_u32() % 8 == 0 { highlight } else { Rgb::GREEN };
                frame = frame.with_activation(format!("s{node}"), counts[node], color);
            }
            if profile.report_every > 0 && rng.next_u32() % profile.report_every == 0 {
                let node = pick(&mut rng, profile.nodes);
                frame = frame.with_report(format!("s{node}"), format!("{}", node % 997));
            }
            frame
        })
        .collect()
}

/// Encode the profile's frames as an in-memory trace.
pub fn record_trace(profile: &Profile) -> Result<Vec<u8>, TraceError> {
    let frames = generate_frames(profile);
    let mut writer = TraceWriter::new(Vec::new(), frames.len() as u64)?;
    for frame in &frames {
        writer.write_frame(frame)?;
    }
    writer.finish()
}

/// The profile's input as a loaded [`TraceSource`].
pub fn trace_source(profile: &Profile) -> Result<TraceSource, TraceError> {
    TraceSource::from_reader(record_trace(profile)?.as_slice())
}
