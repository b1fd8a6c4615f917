//! Strobe: cached frame playback and incremental graph painting for
//! automata simulation traces.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strobe sub-crates. For most users, adding `strobe` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use strobe::prelude::*;
//!
//! // A two-state automaton with one edge.
//! let graph = GraphBuilder::new()
//!     .node("s0", Rgb::new(170, 170, 170))
//!     .node("s1", Rgb::new(170, 170, 170))
//!     .edge("s0-s1", "s0", "s1")
//!     .build()
//!     .unwrap();
//!
//! // Record three cycles to an in-memory trace.
//! let mut writer = TraceWriter::new(Vec::new(), 3).unwrap();
//! for count in 1..=3 {
//!     writer
//!         .write_frame(&Frame::new(b'a').with_activation("s0", count, Rgb::GREEN))
//!         .unwrap();
//! }
//! let source = TraceSource::from_reader(writer.finish().unwrap().as_slice()).unwrap();
//!
//! // Play it back.
//! let mut session =
//!     PlaybackSession::new(graph, InlineRefill::new(source), PlaybackConfig::default()).unwrap();
//! session.prime().unwrap();
//! session.pump();
//! assert_eq!(session.step(1), Ok(StepOutcome::Applied(CycleId(0))));
//! assert_eq!(session.graph().edge_color("s0-s1"), Some(Some(Rgb::GREEN)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strobe-core` | IDs, colours, frames, errors, core traits |
//! | [`graph`] | `strobe-graph` | In-memory rendered graph and its builder |
//! | [`engine`] | `strobe-engine` | Cache window, delta painting, session, autoplay |
//! | [`trace`] | `strobe-trace` | Binary trace files and the file-backed source |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`strobe-core`).
///
/// Contains cycle and graph identifiers, [`types::Rgb`], the per-cycle
/// [`types::Frame`], and the two seams playback talks through
/// ([`types::GraphSurface`], [`types::FrameSource`]).
pub use strobe_core as types;

/// The in-memory rendered graph (`strobe-graph`).
pub use strobe_graph as graph;

/// Playback engine (`strobe-engine`).
///
/// [`engine::PlaybackSession`] for stepping, [`engine::PlaybackController`]
/// for timed autoplay, [`engine::FetchThread`] for background refills.
pub use strobe_engine as engine;

/// Trace recording and loading (`strobe-trace`).
pub use strobe_trace as trace;

/// Common imports for typical Strobe usage.
///
/// ```rust
/// use strobe::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use strobe_core::{
        BatchRequest, CycleId, EdgeId, Frame, FrameBatch, FrameSource, GraphSurface, NodeId,
        Rgb,
    };

    // Errors
    pub use strobe_core::{FetchError, GraphError, StepError};

    // Graph
    pub use strobe_graph::{GraphBuilder, LiveGraph};

    // Engine
    pub use strobe_engine::{
        Direction, DrawMode, FetchThread, InlineRefill, PlaybackConfig, PlaybackController,
        PlaybackSession, Speed, StepOutcome, TickEvent,
    };

    // Trace
    pub use strobe_trace::{TraceReader, TraceSource, TraceWriter};
}
