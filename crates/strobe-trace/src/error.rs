//! Error types for trace reading and writing.

use std::fmt;
use std::io;

/// Errors that can occur while recording or loading a trace.
#[derive(Debug)]
pub enum TraceError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with `b"STRB"`.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// A frame could not be decoded (truncated or corrupt data).
    MalformedFrame {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// Frames are not numbered `0, 1, 2, ...`.
    OutOfOrder {
        /// The cycle the next frame should have had.
        expected: u64,
        /// The cycle it had.
        found: u64,
    },
    /// The header's input length disagrees with the frames present.
    LengthMismatch {
        /// Length declared in the header.
        declared: u64,
        /// Frames actually present.
        found: u64,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"STRB\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::MalformedFrame { detail } => write!(f, "malformed frame: {detail}"),
            Self::OutOfOrder { expected, found } => {
                write!(f, "expected frame for cycle {expected}, found cycle {found}")
            }
            Self::LengthMismatch { declared, found } => {
                write!(f, "header declares {declared} cycles but {found} frames follow")
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
