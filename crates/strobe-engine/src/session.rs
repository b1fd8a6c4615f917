//! The playback session: cursor, stepping protocol, and prefetch.
//!
//! A [`PlaybackSession`] owns the graph, the cache window, the delta
//! applier and the report record, and is the only thing that mutates
//! them. Every mutation takes `&mut self`; the refill port is the only
//! way data enters from elsewhere, and its replies are folded in by
//! [`pump`](PlaybackSession::pump) between steps.
//!
//! # Stepping
//!
//! [`step(delta)`](PlaybackSession::step) moves the cursor relative to
//! the current cycle (`-1` before the first step). A target outside the
//! window either waits for an in-flight refill
//! ([`StepOutcome::RefillPending`]) or fails with
//! [`StepError::OutOfRange`]. After every step the prefetch trigger is
//! evaluated, and at most one refill is ever in flight.

use std::sync::Arc;
use std::time::Instant;

use strobe_core::{BatchRequest, CycleId, FetchError, Frame, FrameBatch, GraphSurface, StepError};

use crate::config::{ConfigError, PlaybackConfig};
use crate::delta::{DeltaApplier, DeltaSet, DeltaSummary, DrawMode, PaintStyle};
use crate::metrics::PlaybackMetrics;
use crate::refill::{RefillPort, RefillReply, RefillTicket};
use crate::report::ReportTracker;
use crate::window::{CacheWindow, WindowError};

/// Result of a successful [`PlaybackSession::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The frame for `cycle` was applied.
    Applied(CycleId),
    /// The frame for `cycle` was applied and it reports, with
    /// `stop_on_report` enabled. Not an error: autoplay should halt.
    StoppedOnReport(CycleId),
    /// The target is not cached yet but a refill is in flight. The step
    /// is remembered and applied by [`PlaybackSession::pump`] if the
    /// refill brings the target in.
    RefillPending,
}

impl StepOutcome {
    /// The cycle now displayed, if the step applied a frame.
    pub fn cycle(self) -> Option<CycleId> {
        match self {
            Self::Applied(c) | Self::StoppedOnReport(c) => Some(c),
            Self::RefillPending => None,
        }
    }
}

/// What one [`PlaybackSession::pump`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// A batch replaced the window.
    pub landed: bool,
    /// A refill failed or delivered an unusable batch.
    pub failed: bool,
    /// Outcome of the deferred step, if one was applied.
    pub deferred: Option<StepOutcome>,
}

/// Playback state for one loaded graph and input.
pub struct PlaybackSession<G, R> {
    graph: G,
    refill: R,
    config: PlaybackConfig,
    window: CacheWindow,
    applier: DeltaApplier,
    reports: ReportTracker,
    metrics: PlaybackMetrics,
    current: Option<CycleId>,
    last_delta: DeltaSummary,
    input_len: Option<u64>,
    in_flight: Option<RefillTicket>,
    deferred: Option<i64>,
    generation: u64,
}

impl<G: GraphSurface, R: RefillPort> PlaybackSession<G, R> {
    /// Start a session over `graph`, fetching through `refill`.
    ///
    /// The graph is painted for the configured draw mode. No frames are
    /// requested until [`prime`](Self::prime) or [`load`](Self::load).
    pub fn new(mut graph: G, refill: R, config: PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut applier = DeltaApplier::new(PaintStyle::from_config(&config));
        applier.prepare(&mut graph);
        let input_len = refill.input_len();
        Ok(Self {
            graph,
            refill,
            config,
            window: CacheWindow::new(),
            applier,
            reports: ReportTracker::new(),
            metrics: PlaybackMetrics::default(),
            current: None,
            last_delta: DeltaSummary::default(),
            input_len,
            in_flight: None,
            deferred: None,
            generation: 0,
        })
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Move the cursor by `delta` cycles.
    pub fn step(&mut self, delta: i64) -> Result<StepOutcome, StepError> {
        let target = self.position().saturating_add(delta);
        let result = self.step_to(target);
        self.maybe_request_refill();
        result
    }

    /// Move the cursor to an absolute cycle.
    pub fn jump_to(&mut self, cycle: CycleId) -> Result<StepOutcome, StepError> {
        let target = i64::try_from(cycle.0).unwrap_or(i64::MAX);
        self.step(target.saturating_sub(self.position()))
    }

    /// Whether a step forward would apply a cached frame.
    pub fn can_step_forward(&self) -> bool {
        self.cached(self.position().saturating_add(1)).is_some()
    }

    /// Whether a step backward would apply a cached frame.
    pub fn can_step_backward(&self) -> bool {
        self.cached(self.position().saturating_sub(1)).is_some()
    }

    fn step_to(&mut self, target: i64) -> Result<StepOutcome, StepError> {
        if let Some((cycle, frame)) = self.cached(target) {
            return Ok(self.apply_at(cycle, &frame));
        }
        self.metrics.cache_misses += 1;
        if target >= 0 && self.in_flight.is_some() {
            tracing::debug!(target, "step deferred until refill lands");
            self.deferred = Some(target);
            return Ok(StepOutcome::RefillPending);
        }
        Err(StepError::OutOfRange {
            target,
            earliest: self.window.earliest(),
            high_water_mark: self.window.high_water_mark(),
        })
    }

    fn cached(&self, target: i64) -> Option<(CycleId, Arc<Frame>)> {
        let cycle = CycleId(u64::try_from(target).ok()?);
        let frame = self.window.get(cycle).ok()?;
        Some((cycle, Arc::clone(frame)))
    }

    fn apply_at(&mut self, cycle: CycleId, frame: &Frame) -> StepOutcome {
        let started = Instant::now();
        let summary = self.applier.apply(&mut self.graph, frame);
        let elapsed = started.elapsed();

        self.current = Some(cycle);
        self.deferred = None;
        self.last_delta = summary;
        self.record_reports_through(cycle);

        self.metrics.steps_applied += 1;
        self.metrics.missing_edges += summary.missing_edges as u64;
        self.metrics.nodes_skipped += summary.missing_nodes as u64;
        self.metrics.last_apply_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        tracing::trace!(
            cycle = cycle.0,
            painted = summary.painted_nodes,
            lit = summary.lit_edges,
            apply_us = self.metrics.last_apply_us,
            "frame applied"
        );

        if self.config.stop_on_report && frame.is_reporting() {
            self.metrics.report_stops += 1;
            StepOutcome::StoppedOnReport(cycle)
        } else {
            StepOutcome::Applied(cycle)
        }
    }

    fn record_reports_through(&mut self, cycle: CycleId) {
        let from = self
            .reports
            .recorded_through()
            .map_or(CycleId(0), CycleId::next);
        if from > cycle {
            return;
        }
        for (c, frame) in self.window.range(from, cycle) {
            self.reports.record(c, frame);
        }
    }

    // ── Refill ─────────────────────────────────────────────────────

    /// Request the first batch, starting at cycle 0.
    ///
    /// Returns `Ok(false)` if frames are already cached or a refill is
    /// already in flight.
    pub fn prime(&mut self) -> Result<bool, FetchError> {
        if !self.window.is_empty() || self.in_flight.is_some() {
            return Ok(false);
        }
        self.issue(BatchRequest {
            start: CycleId(0),
            len: self.config.batch_size,
        })?;
        Ok(true)
    }

    /// Replace the window directly, bypassing the refill port.
    pub fn load(&mut self, batch: FrameBatch) -> Result<(), WindowError> {
        self.window.load(batch)
    }

    /// Fold in every finished refill.
    ///
    /// A successful batch replaces the window; a failure clears the
    /// in-flight guard so the next step can try again. If a deferred step
    /// is now cached it is applied and its outcome returned.
    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        while let Some(reply) = self.refill.poll() {
            self.land(reply, &mut report);
        }

        if report.landed {
            if let Some(target) = self.deferred.take() {
                match self.cached(target) {
                    Some((cycle, frame)) => report.deferred = Some(self.apply_at(cycle, &frame)),
                    None => tracing::debug!(target, "deferred step not in new window; dropped"),
                }
            }
        } else if report.failed && self.in_flight.is_none() {
            self.deferred = None;
        }

        if report.landed || report.deferred.is_some() {
            self.maybe_request_refill();
        }
        report
    }

    fn land(&mut self, reply: RefillReply, report: &mut PumpReport) {
        if reply.ticket.generation != self.generation {
            tracing::debug!(
                generation = reply.ticket.generation,
                "discarding refill from before reset"
            );
            return;
        }
        if self.in_flight == Some(reply.ticket) {
            self.in_flight = None;
        }
        let landed = match reply.result {
            Ok(batch) => self.window.load(batch).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match landed {
            Ok(()) => {
                self.metrics.refills_landed += 1;
                report.landed = true;
            }
            Err(reason) => {
                tracing::warn!(
                    start = reply.ticket.request.start.0,
                    %reason,
                    "refill failed"
                );
                self.metrics.refill_failures += 1;
                report.failed = true;
            }
        }
    }

    fn maybe_request_refill(&mut self) {
        if self.in_flight.is_some() || self.window.is_empty() {
            return;
        }
        let Some(hwm) = self.window.high_water_mark() else {
            return;
        };
        if self.input_len.is_some_and(|len| hwm.0.saturating_add(1) >= len) {
            return;
        }
        if !self.window.is_near_exhaustion(
            self.current,
            self.config.batch_size,
            self.config.prefetch_fraction,
        ) {
            return;
        }
        let start = match self.current {
            Some(c) => c,
            None => self.window.earliest().unwrap_or(CycleId(0)),
        };
        let request = BatchRequest {
            start,
            len: self.config.batch_size,
        };
        if self.issue(request).is_err() {
            tracing::trace!(start = start.0, "prefetch retried on next step");
        }
    }

    fn issue(&mut self, request: BatchRequest) -> Result<(), FetchError> {
        let ticket = RefillTicket {
            generation: self.generation,
            request,
        };
        match self.refill.request(ticket) {
            Ok(()) => {
                tracing::debug!(start = request.start.0, len = request.len, "refill requested");
                self.in_flight = Some(ticket);
                self.metrics.refills_requested += 1;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "refill request rejected");
                self.metrics.refill_failures += 1;
                Err(e)
            }
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Return to the freshly loaded state.
    ///
    /// Clears the window, cursor, delta set, report record, refill
    /// guard, deferred step and metrics, and restores every node's
    /// load-time display with a zero count. Replies already waiting in
    /// the refill port are drained; replies to refills issued before the
    /// reset that arrive later are discarded.
    pub fn reset(&mut self) {
        tracing::debug!(generation = self.generation, "session reset");
        while self.refill.poll().is_some() {}
        self.window.clear();
        self.applier.reset(&mut self.graph);
        self.reports.clear();
        self.metrics = PlaybackMetrics::default();
        self.current = None;
        self.last_delta = DeltaSummary::default();
        self.in_flight = None;
        self.deferred = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Tell the session how many cycles the input has, so it never
    /// prefetches past the end.
    pub fn set_input_len(&mut self, len: Option<u64>) {
        self.input_len = len;
    }

    /// Switch draw mode, repainting the graph.
    pub fn set_mode(&mut self, mode: DrawMode) {
        self.applier.set_mode(&mut self.graph, mode);
        self.config.mode = mode;
    }

    /// Enable or disable halting on reporting cycles.
    pub fn set_stop_on_report(&mut self, enabled: bool) {
        self.config.stop_on_report = enabled;
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Cycle currently displayed; `None` before the first step.
    pub fn current(&self) -> Option<CycleId> {
        self.current
    }

    /// The rendered graph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The cache window.
    pub fn window(&self) -> &CacheWindow {
        &self.window
    }

    /// The report record.
    pub fn reports(&self) -> &ReportTracker {
        &self.reports
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &PlaybackMetrics {
        &self.metrics
    }

    /// Active configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Current draw mode.
    pub fn mode(&self) -> DrawMode {
        self.applier.mode()
    }

    /// Nodes and edges painted by the most recent step.
    pub fn delta_set(&self) -> &DeltaSet {
        self.applier.delta()
    }

    /// Summary of the most recent step.
    pub fn last_delta(&self) -> DeltaSummary {
        self.last_delta
    }

    /// Total input length, if known.
    pub fn input_len(&self) -> Option<u64> {
        self.input_len
    }

    /// Whether a refill is outstanding.
    pub fn is_refill_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a step is waiting on the in-flight refill.
    pub fn has_deferred_step(&self) -> bool {
        self.deferred.is_some()
    }

    /// The refill port.
    pub fn refill_port(&self) -> &R {
        &self.refill
    }

    /// The refill port, mutably (e.g. to complete a manual refill).
    pub fn refill_port_mut(&mut self) -> &mut R {
        &mut self.refill
    }

    /// Tear the session down, returning the graph and port.
    pub fn into_parts(self) -> (G, R) {
        (self.graph, self.refill)
    }

    fn position(&self) -> i64 {
        self.current
            .map_or(-1, |c| i64::try_from(c.0).unwrap_or(i64::MAX))
    }
}

impl<G, R> std::fmt::Debug for PlaybackSession<G, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("current", &self.current)
            .field("earliest", &self.window.earliest())
            .field("high_water_mark", &self.window.high_water_mark())
            .field("in_flight", &self.in_flight)
            .field("deferred", &self.deferred)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
