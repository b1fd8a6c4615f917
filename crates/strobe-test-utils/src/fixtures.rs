//! Reusable frame sources and graph fixtures.
//!
//! - [`ScriptedSource`]: serves a fixed list of frames and logs every fetch.
//! - [`SyntheticSource`]: seeded random activity over a node set, with
//!   counts that are consistent across batches.
//! - [`chain_graph`], [`fan_graph`]: small [`LiveGraph`]s.

use std::sync::Arc;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strobe_core::{BatchRequest, CycleId, FetchError, Frame, FrameBatch, FrameSource, Rgb};
use strobe_graph::{GraphBuilder, LiveGraph};

/// Load-time colour used by the graph fixtures.
pub const IDLE: Rgb = Rgb::new(170, 170, 170);

/// A frame where every listed node is active (green) with the given count.
pub fn active_frame(symbol: u8, active: &[(&str, u64)]) -> Frame {
    active
        .iter()
        .fold(Frame::new(symbol), |f, &(id, count)| {
            f.with_activation(id, count, Rgb::GREEN)
        })
}

/// Frames for cycles `start..start + frames.len()`.
pub fn batch_from(start: u64, frames: Vec<Frame>) -> FrameBatch {
    let frames = frames.into_iter().map(Arc::new).collect();
    FrameBatch::starting_at(CycleId(start), frames).expect("fixture batch must be non-empty")
}

// ── ScriptedSource ─────────────────────────────────────────────────

/// Serves a fixed frame list.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    frames: Vec<Arc<Frame>>,
    fetches: Vec<BatchRequest>,
    fail_next: Option<FetchError>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter().map(Arc::new).collect(),
            fetches: Vec::new(),
            fail_next: None,
        }
    }

    /// `len` cycles in which `node` is active with counts from `counts`
    /// (repeating the last entry once exhausted). Other cycles are quiet.
    pub fn counting(node: &str, counts: &[u64], len: usize) -> Self {
        let frames = (0..len)
            .map(|i| {
                let count = counts.get(i).or(counts.last()).copied().unwrap_or(0);
                active_frame(b'a' + (i % 26) as u8, &[(node, count)])
            })
            .collect();
        Self::new(frames)
    }

    /// Attach a report to cycle `cycle`.
    pub fn with_report(mut self, cycle: usize, node: &str, code: &str) -> Self {
        if let Some(frame) = self.frames.get_mut(cycle) {
            let updated = (**frame).clone().with_report(node, code);
            *frame = Arc::new(updated);
        }
        self
    }

    /// Make the next fetch fail with `error`.
    pub fn fail_next(&mut self, error: FetchError) {
        self.fail_next = Some(error);
    }

    /// Every request served or refused, oldest first.
    pub fn fetches(&self) -> &[BatchRequest] {
        &self.fetches
    }

    /// The frame for `cycle`.
    pub fn frame(&self, cycle: u64) -> Option<&Arc<Frame>> {
        usize::try_from(cycle).ok().and_then(|i| self.frames.get(i))
    }
}

impl FrameSource for ScriptedSource {
    fn fetch(&mut self, request: BatchRequest) -> Result<FrameBatch, FetchError> {
        self.fetches.push(request);
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        let input_len = self.frames.len() as u64;
        let start = usize::try_from(request.start.0).unwrap_or(usize::MAX);
        if start >= self.frames.len() {
            return Err(FetchError::PastEndOfInput {
                start: request.start,
                input_len,
            });
        }
        let end = start.saturating_add(request.len).min(self.frames.len());
        let frames = self.frames[start..end].to_vec();
        FrameBatch::starting_at(request.start, frames).ok_or(FetchError::Unavailable {
            reason: "zero-length request".into(),
        })
    }

    fn input_len(&self) -> Option<u64> {
        Some(self.frames.len() as u64)
    }
}

// ── SyntheticSource ────────────────────────────────────────────────

/// Seeded random playback over `nodes` nodes named `n0`, `n1`, ...
///
/// Each cycle activates every node independently with probability
/// `activity / 256`. Counts are cumulative per node, so they are
/// non-decreasing across the whole input. Node `n0` reports on every
/// cycle it is active.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    inner: ScriptedSource,
}

impl SyntheticSource {
    pub fn new(seed: u64, nodes: usize, len: usize, activity: u8) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts = vec![0u64; nodes];
        let frames = (0..len)
            .map(|cycle| {
                let mut frame = Frame::new(b'a' + (cycle % 26) as u8);
                for (i, count) in counts.iter_mut().enumerate() {
                    if (rng.next_u32() & 0xff) < u32::from(activity) {
                        *count += 1;
                        let id = format!("n{i}");
                        frame = frame.with_activation(id.as_str(), *count, Rgb::GREEN);
                        if i == 0 {
                            frame = frame.with_report(id.as_str(), "0");
                        }
                    }
                }
                frame
            })
            .collect();
        Self {
            inner: ScriptedSource::new(frames),
        }
    }

    /// The frame for `cycle`.
    pub fn frame(&self, cycle: u64) -> Option<&Arc<Frame>> {
        self.inner.frame(cycle)
    }
}

impl FrameSource for SyntheticSource {
    fn fetch(&mut self, request: BatchRequest) -> Result<FrameBatch, FetchError> {
        self.inner.fetch(request)
    }

    fn input_len(&self) -> Option<u64> {
        self.inner.input_len()
    }
}

// ── Graphs ─────────────────────────────────────────────────────────

/// `n0 -> n1 -> ... -> n{len-1}`, edges named `n{i}-n{i+1}`.
pub fn chain_graph(len: usize) -> LiveGraph {
    let mut builder = GraphBuilder::new();
    for i in 0..len {
        builder = builder.node(format!("n{i}"), IDLE);
    }
    for i in 1..len {
        builder = builder.edge(format!("n{}-n{i}", i - 1), format!("n{}", i - 1), format!("n{i}"));
    }
    builder.build().expect("chain fixture is well formed")
}

/// `hub` with an edge to each of `spokes` leaves `s0..`, named `hub-s{i}`.
pub fn fan_graph(spokes: usize) -> LiveGraph {
    let mut builder = GraphBuilder::new().node("hub", IDLE);
    for i in 0..spokes {
        builder = builder
            .node(format!("s{i}"), IDLE)
            .edge(format!("hub-s{i}"), "hub", format!("s{i}"));
    }
    builder.build().expect("fan fixture is well formed")
}
