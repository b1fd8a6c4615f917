//! Per-cycle simulation output and batch delivery types.
//!
//! A [`Frame`] is what the automaton produced on one execution cycle:
//! which nodes were activated (with their cumulative activation count
//! and discrete display colour) and which reporting nodes fired. Frames
//! are immutable once produced and are shared as `Arc<Frame>` between
//! the provider, the cache window, and any in-flight refill.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::color::Rgb;
use crate::id::{CycleId, NodeId};

/// One node's state on a given cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeActivation {
    /// The node this entry refers to.
    pub id: NodeId,
    /// Cumulative activation count. Non-decreasing across the node's
    /// history; drives heat-mode colouring.
    pub count: u64,
    /// Colour to display in discrete mode.
    pub color: Rgb,
}

/// A reporting node that fired on a given cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The reporting node.
    pub node: NodeId,
    /// The node's report code.
    pub code: String,
}

/// One execution cycle's output.
///
/// # Examples
///
/// ```
/// use strobe_core::{Frame, Rgb};
///
/// let frame = Frame::new(b'a')
///     .with_activation("s0", 1, Rgb::GREEN)
///     .with_report("s0", "42");
///
/// assert!(frame.is_reporting());
/// assert_eq!(frame.activated.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Input symbol consumed on this cycle.
    pub symbol: u8,
    /// Nodes whose state is published on this cycle.
    pub activated: Vec<NodeActivation>,
    /// Reporting nodes that fired. Empty on most cycles.
    pub reports: SmallVec<[Report; 2]>,
}

impl Frame {
    /// An empty frame for the given input symbol.
    pub fn new(symbol: u8) -> Self {
        Self {
            symbol,
            activated: Vec::new(),
            reports: SmallVec::new(),
        }
    }

    /// Builder: append a node activation.
    pub fn with_activation(mut self, id: impl Into<NodeId>, count: u64, color: Rgb) -> Self {
        self.activated.push(NodeActivation {
            id: id.into(),
            count,
            color,
        });
        self
    }

    /// Builder: append a report.
    pub fn with_report(mut self, node: impl Into<NodeId>, code: impl Into<String>) -> Self {
        self.reports.push(Report {
            node: node.into(),
            code: code.into(),
        });
        self
    }

    /// Whether any reporting node fired on this cycle.
    pub fn is_reporting(&self) -> bool {
        !self.reports.is_empty()
    }
}

/// A request for a contiguous run of frames starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchRequest {
    /// First cycle the new window should contain.
    pub start: CycleId,
    /// Number of frames requested.
    pub len: usize,
}

/// A contiguous run of frames delivered by a frame provider.
///
/// `frames[i]` is the frame for cycle `high_water_mark - len + 1 + i`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBatch {
    /// Frames in cycle order.
    pub frames: Vec<Arc<Frame>>,
    /// Absolute cycle of the last frame in `frames`.
    pub high_water_mark: CycleId,
}

impl FrameBatch {
    /// Build a batch whose first frame is cycle `start`.
    ///
    /// Returns `None` for an empty frame list.
    pub fn starting_at(start: CycleId, frames: Vec<Arc<Frame>>) -> Option<Self> {
        let last = u64::try_from(frames.len()).ok()?.checked_sub(1)?;
        Some(Self {
            high_water_mark: CycleId(start.0.checked_add(last)?),
            frames,
        })
    }

    /// The cycle of the first frame, or `None` if the batch is empty or
    /// its high-water mark is too small for its length.
    pub fn first_cycle(&self) -> Option<CycleId> {
        let len = u64::try_from(self.frames.len()).ok()?;
        let span = len.checked_sub(1)?;
        self.high_water_mark.0.checked_sub(span).map(CycleId)
    }

    /// Number of frames in the batch.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the batch holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<Arc<Frame>> {
        (0..n).map(|i| Arc::new(Frame::new(i as u8))).collect()
    }

    #[test]
    fn starting_at_computes_high_water_mark() {
        let batch = FrameBatch::starting_at(CycleId(100), frames(50)).unwrap();
        assert_eq!(batch.high_water_mark, CycleId(149));
        assert_eq!(batch.first_cycle(), Some(CycleId(100)));
        assert_eq!(batch.len(), 50);
    }

    #[test]
    fn starting_at_rejects_empty() {
        assert!(FrameBatch::starting_at(CycleId(0), Vec::new()).is_none());
    }

    #[test]
    fn first_cycle_detects_inconsistent_mark() {
        let batch = FrameBatch {
            frames: frames(5),
            high_water_mark: CycleId(2),
        };
        assert_eq!(batch.first_cycle(), None);
    }

    #[test]
    fn plain_frame_is_not_reporting() {
        let frame = Frame::new(b'x').with_activation("a", 3, Rgb::GREEN);
        assert!(!frame.is_reporting());
        assert_eq!(frame.activated[0].id.as_str(), "a");
    }
}
