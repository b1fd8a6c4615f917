//! A whole trace held in memory and served as batches.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use strobe_core::{BatchRequest, CycleId, FetchError, Frame, FrameBatch, FrameSource};

use crate::error::TraceError;
use crate::reader::TraceReader;

/// Frame provider backed by a fully loaded trace.
///
/// Loading validates the whole file up front: frames must be numbered
/// `0..input_len` with no gaps, and their number must match the header.
/// Fetching afterwards never fails except past the end of input.
#[derive(Clone, Debug)]
pub struct TraceSource {
    frames: Vec<Arc<Frame>>,
}

impl TraceSource {
    /// Load and validate a trace from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TraceError> {
        let mut reader = TraceReader::open(reader)?;
        let declared = reader.input_len();
        let mut frames = Vec::with_capacity(usize::try_from(declared).unwrap_or(0).min(1 << 16));
        while let Some(entry) = reader.next_entry()? {
            let expected = frames.len() as u64;
            if entry.cycle.0 != expected {
                return Err(TraceError::OutOfOrder {
                    expected,
                    found: entry.cycle.0,
                });
            }
            frames.push(Arc::new(entry.frame));
        }
        if frames.len() as u64 != declared {
            return Err(TraceError::LengthMismatch {
                declared,
                found: frames.len() as u64,
            });
        }
        tracing::debug!(cycles = declared, "trace loaded");
        Ok(Self { frames })
    }

    /// Load a trace file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let source = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), cycles = source.len(), "opened trace");
        Ok(source)
    }

    /// Number of cycles in the trace.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the trace holds no cycles.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame recorded for `cycle`.
    pub fn frame(&self, cycle: CycleId) -> Option<&Arc<Frame>> {
        usize::try_from(cycle.0).ok().and_then(|i| self.frames.get(i))
    }
}

impl FrameSource for TraceSource {
    fn fetch(&mut self, request: BatchRequest) -> Result<FrameBatch, FetchError> {
        let input_len = self.frames.len() as u64;
        let start = match usize::try_from(request.start.0) {
            Ok(start) if start < self.frames.len() => start,
            _ => {
                return Err(FetchError::PastEndOfInput {
                    start: request.start,
                    input_len,
                })
            }
        };
        let end = start.saturating_add(request.len).min(self.frames.len());
        tracing::trace!(start, end, "serving trace batch");
        FrameBatch::starting_at(request.start, self.frames[start..end].to_vec()).ok_or_else(|| {
            FetchError::Unavailable {
                reason: "zero-length batch request".into(),
            }
        })
    }

    fn input_len(&self) -> Option<u64> {
        Some(self.frames.len() as u64)
    }
}
