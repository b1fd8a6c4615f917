//! Error types for the Strobe playback engine.
//!
//! Organised by boundary: stepping the playback cursor, looking up
//! cached frames, mutating the rendered graph, and fetching batches from
//! a frame provider. None of these is fatal; the playback controller
//! decides what the user sees.

use std::error::Error;
use std::fmt;

use crate::id::{CycleId, EdgeId, NodeId};

/// Errors from moving the playback cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The step target lies outside the cached window and no refill is
    /// in flight that could bring it in.
    OutOfRange {
        /// The requested absolute cycle (negative when stepping back
        /// past the first cycle).
        target: i64,
        /// Earliest cycle in the window, if any frames are cached.
        earliest: Option<CycleId>,
        /// Last cycle in the window, if any frames are cached.
        high_water_mark: Option<CycleId>,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                target,
                earliest,
                high_water_mark,
            } => match (earliest, high_water_mark) {
                (Some(lo), Some(hi)) => {
                    write!(f, "cycle {target} is outside the cached range {lo}..={hi}")
                }
                _ => write!(f, "cycle {target} requested with an empty cache"),
            },
        }
    }
}

impl Error for StepError {}

/// A lookup for a cycle that is not resident in the cache window.
///
/// Internal to the engine: a miss is always paired with a refill
/// decision and never surfaced to the end user directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheMiss {
    /// The cycle that was requested.
    pub cycle: CycleId,
}

impl fmt::Display for CacheMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle {} is not cached", self.cycle)
    }
}

impl Error for CacheMiss {}

/// Errors from mutating the rendered graph.
///
/// Both variants are tolerated by the delta applier: the offending
/// element is logged and skipped, and the rest of the step proceeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The node does not exist (e.g. removed by a topology edit).
    MissingNode {
        /// The missing node.
        id: NodeId,
    },
    /// The edge does not exist (e.g. removed by a topology edit).
    MissingEdge {
        /// The missing edge.
        id: EdgeId,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode { id } => write!(f, "node '{id}' not found"),
            Self::MissingEdge { id } => write!(f, "edge '{id}' not found"),
        }
    }
}

impl Error for GraphError {}

/// Errors reported by a frame provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// The provider could not produce the batch.
    Unavailable {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The requested start lies at or beyond the end of the input.
    PastEndOfInput {
        /// The requested first cycle.
        start: CycleId,
        /// Total number of cycles in the input.
        input_len: u64,
    },
    /// The provider's worker is gone (thread exited or channel closed).
    Disconnected,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "frame batch unavailable: {reason}"),
            Self::PastEndOfInput { start, input_len } => {
                write!(f, "cycle {start} is past the end of input ({input_len} cycles)")
            }
            Self::Disconnected => write!(f, "frame provider disconnected"),
        }
    }
}

impl Error for FetchError {}
