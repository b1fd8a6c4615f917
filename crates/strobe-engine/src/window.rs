//! The resident window of cached frames.
//!
//! A [`CacheWindow`] holds one contiguous run of frames addressed by
//! absolute cycle. It is replaced wholesale by each delivered batch,
//! never merged, so the addressable range is always exactly
//! `earliest()..=high_water_mark()`.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use strobe_core::{CacheMiss, CycleId, Frame, FrameBatch};

// ── WindowError ────────────────────────────────────────────────────

/// Errors from [`CacheWindow::load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowError {
    /// The batch is empty, or holds more frames than there are cycles
    /// up to its high-water mark.
    InvalidBatch {
        /// Number of frames delivered.
        len: usize,
        /// High-water mark the batch claimed.
        high_water_mark: CycleId,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBatch {
                len,
                high_water_mark,
            } => write!(
                f,
                "invalid batch: {len} frames ending at cycle {high_water_mark}"
            ),
        }
    }
}

impl Error for WindowError {}

// ── CacheWindow ────────────────────────────────────────────────────

/// Contiguous cached frames, addressed by absolute cycle.
#[derive(Clone, Debug, Default)]
pub struct CacheWindow {
    frames: Vec<Arc<Frame>>,
    high_water_mark: Option<CycleId>,
}

impl CacheWindow {
    /// An empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the window with `batch`.
    ///
    /// On error the previous contents are left untouched.
    pub fn load(&mut self, batch: FrameBatch) -> Result<(), WindowError> {
        let Some(first) = batch.first_cycle() else {
            return Err(WindowError::InvalidBatch {
                len: batch.len(),
                high_water_mark: batch.high_water_mark,
            });
        };
        tracing::debug!(
            first = first.0,
            high_water_mark = batch.high_water_mark.0,
            len = batch.len(),
            "cache window loaded"
        );
        self.frames = batch.frames;
        self.high_water_mark = Some(batch.high_water_mark);
        Ok(())
    }

    /// Look up the frame for `cycle`.
    pub fn get(&self, cycle: CycleId) -> Result<&Arc<Frame>, CacheMiss> {
        self.index_of(cycle)
            .and_then(|i| self.frames.get(i))
            .ok_or(CacheMiss { cycle })
    }

    /// First addressable cycle, or `None` when empty.
    pub fn earliest(&self) -> Option<CycleId> {
        let hwm = self.high_water_mark?;
        let span = u64::try_from(self.frames.len()).ok()?.checked_sub(1)?;
        hwm.0.checked_sub(span).map(CycleId)
    }

    /// Last addressable cycle, or `None` when empty.
    pub fn high_water_mark(&self) -> Option<CycleId> {
        self.high_water_mark
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames are cached.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether `cycle` is addressable.
    pub fn contains(&self, cycle: CycleId) -> bool {
        self.index_of(cycle).is_some()
    }

    /// Cached frames for `from..=to`, clipped to the window.
    pub fn range(
        &self,
        from: CycleId,
        to: CycleId,
    ) -> impl Iterator<Item = (CycleId, &Arc<Frame>)> + '_ {
        let (lo, hi) = match (self.earliest(), self.high_water_mark) {
            (Some(lo), Some(hi)) => (from.0.max(lo.0), to.0.min(hi.0)),
            _ => (1, 0),
        };
        (lo..=hi).filter_map(move |c| {
            let cycle = CycleId(c);
            self.get(cycle).ok().map(|frame| (cycle, frame))
        })
    }

    /// Whether the distance from `cursor` to the high-water mark is at
    /// most `fraction * batch_size`.
    ///
    /// A `cursor` of `None` is the position before the first cycle. An
    /// empty window is never near exhaustion: there is nothing to
    /// prefetch after.
    pub fn is_near_exhaustion(
        &self,
        cursor: Option<CycleId>,
        batch_size: usize,
        fraction: f64,
    ) -> bool {
        let Some(hwm) = self.high_water_mark else {
            return false;
        };
        let cursor = cursor.map_or(-1, |c| i128::from(c.0));
        let distance = i128::from(hwm.0) - cursor;
        (distance as f64) <= fraction * batch_size as f64
    }

    /// Drop every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.high_water_mark = None;
    }

    fn index_of(&self, cycle: CycleId) -> Option<usize> {
        let earliest = self.earliest()?;
        let hwm = self.high_water_mark?;
        if cycle < earliest || cycle > hwm {
            return None;
        }
        usize::try_from(cycle.0 - earliest.0).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(start: u64, n: usize) -> FrameBatch {
        let frames = (0..n).map(|i| Arc::new(Frame::new(i as u8))).collect();
        FrameBatch::starting_at(CycleId(start), frames).unwrap()
    }

    #[test]
    fn empty_window_misses_everything() {
        let w = CacheWindow::new();
        assert!(w.is_empty());
        assert_eq!(w.earliest(), None);
        assert_eq!(w.high_water_mark(), None);
        assert_eq!(w.get(CycleId(0)), Err(CacheMiss { cycle: CycleId(0) }));
    }

    #[test]
    fn load_addresses_by_absolute_cycle() {
        let mut w = CacheWindow::new();
        w.load(batch(100, 10)).unwrap();
        assert_eq!(w.earliest(), Some(CycleId(100)));
        assert_eq!(w.high_water_mark(), Some(CycleId(109)));
        assert_eq!(w.get(CycleId(103)).unwrap().symbol, 3);
        assert!(w.contains(CycleId(109)));
        assert!(!w.contains(CycleId(99)));
        assert!(!w.contains(CycleId(110)));
    }

    #[test]
    fn load_replaces_rather_than_merges() {
        let mut w = CacheWindow::new();
        w.load(batch(0, 100)).unwrap();
        w.load(batch(75, 100)).unwrap();
        assert_eq!(w.len(), 100);
        assert!(!w.contains(CycleId(74)));
        assert!(w.contains(CycleId(174)));
    }

    #[test]
    fn invalid_batch_keeps_previous_contents() {
        let mut w = CacheWindow::new();
        w.load(batch(0, 5)).unwrap();
        let bad = FrameBatch {
            frames: vec![Arc::new(Frame::new(0)); 4],
            high_water_mark: CycleId(2),
        };
        assert_eq!(
            w.load(bad),
            Err(WindowError::InvalidBatch {
                len: 4,
                high_water_mark: CycleId(2)
            })
        );
        let empty = FrameBatch {
            frames: Vec::new(),
            high_water_mark: CycleId(9),
        };
        assert!(w.load(empty).is_err());
        assert_eq!(w.high_water_mark(), Some(CycleId(4)));
    }

    #[test]
    fn exhaustion_threshold_is_distance_to_high_water_mark() {
        let mut w = CacheWindow::new();
        w.load(batch(0, 100)).unwrap();
        assert!(!w.is_near_exhaustion(None, 100, 0.25));
        assert!(!w.is_near_exhaustion(Some(CycleId(73)), 100, 0.25));
        assert!(w.is_near_exhaustion(Some(CycleId(74)), 100, 0.25));
        assert!(w.is_near_exhaustion(Some(CycleId(75)), 100, 0.25));
        assert!(w.is_near_exhaustion(Some(CycleId(99)), 100, 0.25));
    }

    #[test]
    fn short_window_is_exhausted_before_first_step() {
        let mut w = CacheWindow::new();
        w.load(batch(0, 10)).unwrap();
        assert!(w.is_near_exhaustion(None, 100, 0.25));
        assert!(!CacheWindow::new().is_near_exhaustion(None, 100, 0.25));
    }

    #[test]
    fn range_clips_to_window() {
        let mut w = CacheWindow::new();
        w.load(batch(10, 5)).unwrap();
        let cycles: Vec<u64> = w.range(CycleId(0), CycleId(12)).map(|(c, _)| c.0).collect();
        assert_eq!(cycles, [10, 11, 12]);
        assert_eq!(w.range(CycleId(20), CycleId(30)).count(), 0);
        assert_eq!(CacheWindow::new().range(CycleId(0), CycleId(3)).count(), 0);
    }

    #[test]
    fn clear_empties() {
        let mut w = CacheWindow::new();
        w.load(batch(0, 3)).unwrap();
        w.clear();
        assert!(w.is_empty());
        assert!(!w.contains(CycleId(0)));
    }
}
