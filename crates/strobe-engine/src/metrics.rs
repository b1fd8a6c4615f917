//! Counters for playback activity.
//!
//! [`PlaybackMetrics`] is cumulative since the session was created or
//! last reset; [`last_apply_us`](PlaybackMetrics::last_apply_us) is the
//! only per-step field.

/// Cumulative playback counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaybackMetrics {
    /// Steps that applied a frame (including report stops).
    pub steps_applied: u64,
    /// Steps that returned `StoppedOnReport`.
    pub report_stops: u64,
    /// Step targets that were not in the window.
    pub cache_misses: u64,
    /// Refill requests handed to the refill port.
    pub refills_requested: u64,
    /// Refills whose batch replaced the window.
    pub refills_landed: u64,
    /// Refills that failed, were rejected by the port, or delivered an
    /// invalid batch.
    pub refill_failures: u64,
    /// Edges the delta applier could not find.
    pub missing_edges: u64,
    /// Node ids the delta applier could not find.
    pub nodes_skipped: u64,
    /// Time spent in the most recent delta apply, in microseconds.
    pub last_apply_us: u64,
}
