//! Binary trace files for Strobe frame streams.
//!
//! A trace is a recorded simulation: one [`Frame`](strobe_core::Frame)
//! per cycle, written once and played back many times.
//!
//! - [`TraceWriter`] records frames to any `Write` sink
//! - [`TraceReader`] reads them back from any `Read` source
//! - [`TraceSource`] loads a whole trace and serves batches as a
//!   [`FrameSource`](strobe_core::FrameSource)
//! - All I/O uses a custom binary codec (no serde dependency)
//!
//! # Format
//!
//! ```text
//! [MAGIC "STRB"] [VERSION u8] [input_len u64]
//! [Frame 0] [Frame 1] ... [Frame input_len-1]
//! ```
//!
//! Each frame holds its cycle, the input symbol, the activated nodes
//! (id, count, colour) and the reports (node id, code).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod reader;
pub mod source;
pub mod writer;

pub use codec::TraceEntry;
pub use error::TraceError;
pub use reader::{EntryIter, TraceReader};
pub use source::TraceSource;
pub use writer::TraceWriter;

/// Magic bytes at the start of every trace file.
pub const MAGIC: [u8; 4] = *b"STRB";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
