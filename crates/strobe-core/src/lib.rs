//! Core types and traits for the Strobe playback engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Strobe workspace:
//! cycle and graph identifiers, colours, the per-cycle [`Frame`] record,
//! error types, and the two seams the engine talks through
//! ([`GraphSurface`] and [`FrameSource`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod frame;
pub mod id;
pub mod traits;

pub use color::{ColorParseError, Rgb};
pub use error::{CacheMiss, FetchError, GraphError, StepError};
pub use frame::{BatchRequest, Frame, FrameBatch, NodeActivation, Report};
pub use id::{CycleId, EdgeId, NodeId};
pub use traits::{FrameSource, GraphSurface, NodeState};
