//! Trace recording writer.
//!
//! [`TraceWriter`] streams frames to any `Write` sink. The header is
//! written immediately on construction and declares how many cycles
//! the trace will hold.

use std::io::Write;

use strobe_core::{CycleId, Frame};

use crate::codec::{encode_frame, encode_header};
use crate::error::TraceError;

/// Writes a trace to a byte stream.
///
/// Frames are numbered in the order they are written, starting at
/// cycle 0.
///
/// # Examples
///
/// ```
/// use strobe_core::{CycleId, Frame, Rgb};
/// use strobe_trace::{TraceReader, TraceWriter};
///
/// let mut buf = Vec::new();
/// let mut writer = TraceWriter::new(&mut buf, 2).unwrap();
/// writer.write_frame(&Frame::new(b'a').with_activation("s0", 1, Rgb::GREEN)).unwrap();
/// writer.write_frame(&Frame::new(b'b')).unwrap();
/// writer.finish().unwrap();
///
/// let mut reader = TraceReader::open(buf.as_slice()).unwrap();
/// assert_eq!(reader.input_len(), 2);
/// let first = reader.next_entry().unwrap().unwrap();
/// assert_eq!(first.cycle, CycleId(0));
/// assert_eq!(first.frame.symbol, b'a');
/// assert_eq!(reader.next_entry().unwrap().unwrap().cycle, CycleId(1));
/// assert!(reader.next_entry().unwrap().is_none());
/// ```
pub struct TraceWriter<W: Write> {
    writer: W,
    input_len: u64,
    frames_written: u64,
}

impl<W: Write> TraceWriter<W> {
    /// Create a writer for a trace of `input_len` cycles, writing the
    /// header immediately.
    pub fn new(mut writer: W, input_len: u64) -> Result<Self, TraceError> {
        encode_header(&mut writer, input_len)?;
        Ok(Self {
            writer,
            input_len,
            frames_written: 0,
        })
    }

    /// Append the frame for the next cycle and return that cycle.
    ///
    /// Fails with [`TraceError::LengthMismatch`] once the declared
    /// length has been reached.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<CycleId, TraceError> {
        if self.frames_written >= self.input_len {
            return Err(TraceError::LengthMismatch {
                declared: self.input_len,
                found: self.frames_written + 1,
            });
        }
        let cycle = CycleId(self.frames_written);
        encode_frame(&mut self.writer, cycle, frame)?;
        self.frames_written += 1;
        Ok(cycle)
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Cycles declared in the header.
    pub fn input_len(&self) -> u64 {
        self.input_len
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), TraceError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush, check that every declared cycle was written, and return
    /// the sink.
    pub fn finish(mut self) -> Result<W, TraceError> {
        self.flush()?;
        if self.frames_written != self.input_len {
            return Err(TraceError::LengthMismatch {
                declared: self.input_len,
                found: self.frames_written,
            });
        }
        Ok(self.writer)
    }
}
