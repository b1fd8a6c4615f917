//! Trace playback reader.
//!
//! [`TraceReader`] reads frames from any `Read` source. The header is
//! validated on construction.

use std::io::Read;

use crate::codec::{decode_frame, decode_header, TraceEntry};
use crate::error::TraceError;

/// Reads a trace from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct TraceReader<R: Read> {
    reader: R,
    input_len: u64,
    entries_read: u64,
}

impl<R: Read> TraceReader<R> {
    /// Open a trace stream, reading and validating the header.
    pub fn open(mut reader: R) -> Result<Self, TraceError> {
        let input_len = decode_header(&mut reader)?;
        Ok(Self {
            reader,
            input_len,
            entries_read: 0,
        })
    }

    /// Cycles declared in the header.
    pub fn input_len(&self) -> u64 {
        self.input_len
    }

    /// Read the next entry, or `None` if the stream is exhausted.
    pub fn next_entry(&mut self) -> Result<Option<TraceEntry>, TraceError> {
        let entry = decode_frame(&mut self.reader)?;
        if entry.is_some() {
            self.entries_read += 1;
        }
        Ok(entry)
    }

    /// Number of entries read so far.
    pub fn entries_read(&self) -> u64 {
        self.entries_read
    }

    /// Convert into an entry iterator.
    pub fn entries(self) -> EntryIter<R> {
        EntryIter {
            reader: self.reader,
            done: false,
        }
    }
}

/// Iterator adapter over trace entries. Stops after the first error.
pub struct EntryIter<R: Read> {
    reader: R,
    done: bool,
}

impl<R: Read> Iterator for EntryIter<R> {
    type Item = Result<TraceEntry, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match decode_frame(&mut self.reader) {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::TraceWriter;
    use strobe_core::{CycleId, Frame, Rgb};

    fn trace(len: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut w = TraceWriter::new(&mut buf, len).unwrap();
        for i in 0..len {
            let frame = Frame::new(b'a' + i as u8).with_activation("s0", i + 1, Rgb::GREEN);
            w.write_frame(&frame).unwrap();
        }
        w.finish().unwrap();
        buf
    }

    #[test]
    fn reads_entries_in_order() {
        let buf = trace(4);
        let mut r = TraceReader::open(buf.as_slice()).unwrap();
        assert_eq!(r.input_len(), 4);
        let mut cycles = Vec::new();
        while let Some(entry) = r.next_entry().unwrap() {
            cycles.push(entry.cycle);
        }
        assert_eq!(cycles, (0..4).map(CycleId).collect::<Vec<_>>());
        assert_eq!(r.entries_read(), 4);
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut buf = trace(3);
        buf.truncate(buf.len() - 2);
        let results: Vec<_> = TraceReader::open(buf.as_slice())
            .unwrap()
            .entries()
            .collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
    }

    #[test]
    fn empty_stream_is_invalid() {
        assert!(matches!(
            TraceReader::open(&[][..]),
            Err(TraceError::Io(_))
        ));
    }
}
