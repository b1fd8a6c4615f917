//! Playback engine for Strobe.
//!
//! Owns everything between a frame provider and the rendered graph:
//!
//! - [`CacheWindow`]: the resident, contiguous slice of frames.
//! - [`DeltaApplier`]: paints a frame onto the graph, touching only what
//!   changed, and remembers what it touched so the next step can revert.
//! - [`ReportTracker`]: the exportable record of reporting cycles.
//! - [`PlaybackSession`]: the cursor and stepping protocol tying the
//!   above together, plus prefetch through a [`RefillPort`].
//! - [`PlaybackController`]: the autoplay state machine, driven by
//!   caller-supplied instants so it can be tested without real timers.
//!
//! # Architecture
//!
//! ```text
//!   FrameSource ──fetch──> RefillPort ──pump──> CacheWindow
//!                         (inline or                │
//!                          FetchThread)             │ get(cycle)
//!                                                   v
//!   PlaybackController ──step──> PlaybackSession ──apply──> DeltaApplier ──> GraphSurface
//!        (tick(now))                   │
//!                                      └──record──> ReportTracker
//! ```
//!
//! Everything runs on one logical actor; the only asynchronous piece is
//! the optional [`FetchThread`], whose results are folded in by
//! [`PlaybackSession::pump`] between steps.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod delta;
pub mod fetch_thread;
pub mod metrics;
pub mod refill;
pub mod report;
pub mod session;
pub mod window;

pub use config::{ConfigError, PlaybackConfig};
pub use controller::{
    ControlError, ControllerState, Direction, PlaybackController, Speed, SpeedTier, TickEvent,
};
pub use delta::{DeltaApplier, DeltaSet, DeltaSummary, DrawMode, HeatRamp, PaintStyle};
pub use fetch_thread::FetchThread;
pub use metrics::PlaybackMetrics;
pub use refill::{InlineRefill, RefillPort, RefillReply, RefillTicket};
pub use report::ReportTracker;
pub use session::{PlaybackSession, PumpReport, StepOutcome};
pub use window::{CacheWindow, WindowError};
