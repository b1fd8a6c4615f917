//! Accumulated record of reporting cycles.
//!
//! Each reporting cycle contributes one text block:
//!
//! ```text
//! Reporting on '<symbol>' @cycle <n>:
//! 	id: <node>  report code: <code>
//! ```
//!
//! The tracker keeps a high-water mark of the last cycle it recorded, so
//! revisiting a cycle (stepping back and forth) never duplicates a block.

use std::fmt::Write as _;
use std::io;

use indexmap::IndexMap;
use smallvec::SmallVec;
use strobe_core::{CycleId, Frame, Report};

/// Append-only report record keyed by absolute cycle.
#[derive(Clone, Debug, Default)]
pub struct ReportTracker {
    text: String,
    recorded_through: Option<CycleId>,
    by_cycle: IndexMap<CycleId, SmallVec<[Report; 2]>>,
}

impl ReportTracker {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `frame` as the output of `cycle`.
    ///
    /// Cycles at or below the high-water mark are ignored. A frame
    /// without reports only advances the mark. Returns whether a block
    /// was appended.
    pub fn record(&mut self, cycle: CycleId, frame: &Frame) -> bool {
        if self.recorded_through.is_some_and(|done| cycle <= done) {
            return false;
        }
        self.recorded_through = Some(cycle);
        if !frame.is_reporting() {
            return false;
        }

        // Writing to a String cannot fail.
        let _ = writeln!(
            self.text,
            "Reporting on '{}' @cycle {}:",
            frame.symbol.escape_ascii(),
            cycle
        );
        for report in &frame.reports {
            let _ = writeln!(
                self.text,
                "\tid: {}  report code: {}",
                report.node, report.code
            );
        }
        self.by_cycle.insert(cycle, frame.reports.clone());
        tracing::debug!(
            cycle = cycle.0,
            reports = frame.reports.len(),
            "reporting cycle recorded"
        );
        true
    }

    /// The accumulated export text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Highest cycle recorded so far.
    pub fn recorded_through(&self) -> Option<CycleId> {
        self.recorded_through
    }

    /// Reports recorded for `cycle`; empty if it did not report.
    pub fn reports_at(&self, cycle: CycleId) -> &[Report] {
        self.by_cycle.get(&cycle).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Report code `node` produced on `cycle`, for node annotations.
    pub fn code_for(&self, cycle: CycleId, node: &str) -> Option<&str> {
        self.reports_at(cycle)
            .iter()
            .find(|r| r.node.as_str() == node)
            .map(|r| r.code.as_str())
    }

    /// Reporting cycles in the order they were recorded.
    pub fn reporting_cycles(&self) -> impl Iterator<Item = CycleId> + '_ {
        self.by_cycle.keys().copied()
    }

    /// Whether any cycle has reported.
    pub fn has_reports(&self) -> bool {
        !self.by_cycle.is_empty()
    }

    /// Write the export text to `out`.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.text.as_bytes())?;
        out.flush()
    }

    /// Forget everything, including the high-water mark.
    pub fn clear(&mut self) {
        self.text.clear();
        self.recorded_through = None;
        self.by_cycle.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strobe_core::Rgb;

    fn reporting(symbol: u8) -> Frame {
        Frame::new(symbol)
            .with_activation("r", 1, Rgb::GREEN)
            .with_report("r", "12")
    }

    #[test]
    fn block_format() {
        let mut t = ReportTracker::new();
        let frame = reporting(b'q').with_report("s", "ab");
        assert!(t.record(CycleId(7), &frame));
        assert_eq!(
            t.text(),
            "Reporting on 'q' @cycle 7:\n\tid: r  report code: 12\n\tid: s  report code: ab\n"
        );
        assert_eq!(t.code_for(CycleId(7), "s"), Some("ab"));
        assert_eq!(t.code_for(CycleId(7), "zz"), None);
    }

    #[test]
    fn revisits_do_not_duplicate() {
        let mut t = ReportTracker::new();
        assert!(t.record(CycleId(3), &reporting(b'a')));
        assert!(!t.record(CycleId(3), &reporting(b'a')));
        assert!(!t.record(CycleId(1), &reporting(b'a')));
        assert_eq!(t.text().matches("@cycle").count(), 1);
    }

    #[test]
    fn quiet_frames_advance_the_mark() {
        let mut t = ReportTracker::new();
        assert!(!t.record(CycleId(4), &Frame::new(b'z')));
        assert_eq!(t.recorded_through(), Some(CycleId(4)));
        assert!(!t.has_reports());
        assert!(t.text().is_empty());
    }

    #[test]
    fn non_printable_symbol_is_escaped() {
        let mut t = ReportTracker::new();
        t.record(CycleId(0), &reporting(b'\n'));
        assert!(t.text().starts_with("Reporting on '\\n' @cycle 0:"));
    }

    #[test]
    fn write_to_and_clear() {
        let mut t = ReportTracker::new();
        t.record(CycleId(2), &reporting(b'a'));
        t.record(CycleId(5), &reporting(b'b'));
        let mut out = Vec::new();
        t.write_to(&mut out).unwrap();
        assert_eq!(out, t.text().as_bytes());
        assert_eq!(
            t.reporting_cycles().collect::<Vec<_>>(),
            [CycleId(2), CycleId(5)]
        );

        t.clear();
        assert!(t.text().is_empty());
        assert_eq!(t.recorded_through(), None);
        assert!(t.record(CycleId(2), &reporting(b'a')));
    }
}
