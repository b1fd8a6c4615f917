//! Binary encode/decode for the trace format.
//!
//! All integers are little-endian. Strings are length-prefixed with a
//! `u32` length. No compression, no alignment padding.
//!
//! Frame layout:
//!
//! ```text
//! cycle u64
//! symbol u8
//! activation_count u32
//!   (id str, count u64, r u8, g u8, b u8) * activation_count
//! report_count u32
//!   (node str, code str) * report_count
//! ```

use std::io::{Read, Write};

use strobe_core::{CycleId, Frame, Rgb};

use crate::error::TraceError;
use crate::{FORMAT_VERSION, MAGIC};

/// Upper bound on pre-allocation from a decoded count; larger counts
/// still decode, they just grow the vector as they go.
const MAX_PREALLOC: usize = 4096;

/// One decoded frame and the cycle it was recorded for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    /// Absolute cycle.
    pub cycle: CycleId,
    /// The frame.
    pub frame: Frame,
}

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), TraceError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), TraceError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), TraceError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a `u32` element count, rejecting counts that do not fit.
fn write_count(w: &mut dyn Write, n: usize, what: &str) -> Result<(), TraceError> {
    let n = u32::try_from(n).map_err(|_| TraceError::MalformedFrame {
        detail: format!("{what} count {n} exceeds u32::MAX"),
    })?;
    write_u32_le(w, n)
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), TraceError> {
    write_count(w, s.len(), "string byte")?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, TraceError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, TraceError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, TraceError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a length-prefixed UTF-8 string.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, TraceError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
    r.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(TraceError::MalformedFrame {
            detail: format!("truncated string: got {} of {len} bytes", buf.len()),
        });
    }
    String::from_utf8(buf).map_err(|e| TraceError::MalformedFrame {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

// ── Header ──────────────────────────────────────────────────────

/// Encode the trace header.
pub fn encode_header(w: &mut dyn Write, input_len: u64) -> Result<(), TraceError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u64_le(w, input_len)?;
    Ok(())
}

/// Decode and validate the trace header, returning the input length.
pub fn decode_header(r: &mut dyn Read) -> Result<u64, TraceError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(TraceError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(TraceError::UnsupportedVersion { found: version });
    }
    read_u64_le(r)
}

// ── Frames ──────────────────────────────────────────────────────

/// Encode one frame.
pub fn encode_frame(w: &mut dyn Write, cycle: CycleId, frame: &Frame) -> Result<(), TraceError> {
    write_u64_le(w, cycle.0)?;
    write_u8(w, frame.symbol)?;

    write_count(w, frame.activated.len(), "activation")?;
    for a in &frame.activated {
        write_length_prefixed_str(w, a.id.as_str())?;
        write_u64_le(w, a.count)?;
        w.write_all(&[a.color.r, a.color.g, a.color.b])?;
    }

    write_count(w, frame.reports.len(), "report")?;
    for report in &frame.reports {
        write_length_prefixed_str(w, report.node.as_str())?;
        write_length_prefixed_str(w, &report.code)?;
    }
    Ok(())
}

/// Decode one frame, or `None` at a clean end of stream.
///
/// End of stream is clean only if it falls exactly on a frame boundary;
/// a partial cycle header is [`TraceError::MalformedFrame`].
pub fn decode_frame(r: &mut dyn Read) -> Result<Option<TraceEntry>, TraceError> {
    let mut cycle_buf = [0u8; 8];
    let mut filled = 0;
    while filled < 8 {
        match r.read(&mut cycle_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(TraceError::MalformedFrame {
                    detail: format!("truncated frame header: got {filled} of 8 bytes for cycle"),
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TraceError::Io(e)),
        }
    }
    let cycle = CycleId(u64::from_le_bytes(cycle_buf));

    let mut frame = Frame::new(read_u8(r)?);

    let activations = read_u32_le(r)? as usize;
    frame.activated.reserve(activations.min(MAX_PREALLOC));
    for _ in 0..activations {
        let id = read_length_prefixed_str(r)?;
        let count = read_u64_le(r)?;
        let mut rgb = [0u8; 3];
        r.read_exact(&mut rgb)?;
        frame = frame.with_activation(id, count, Rgb::new(rgb[0], rgb[1], rgb[2]));
    }

    let reports = read_u32_le(r)? as usize;
    for _ in 0..reports {
        let node = read_length_prefixed_str(r)?;
        let code = read_length_prefixed_str(r)?;
        frame = frame.with_report(node, code);
    }

    Ok(Some(TraceEntry { cycle, frame }))
}
