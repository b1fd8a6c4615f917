//! Playback configuration, validation, and error types.
//!
//! [`PlaybackConfig`] is the builder-input for a
//! [`PlaybackSession`](crate::PlaybackSession) and
//! [`PlaybackController`](crate::PlaybackController).
//! [`validate()`](PlaybackConfig::validate) checks it once at
//! construction; nothing downstream re-checks.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use strobe_core::Rgb;

use crate::delta::{DrawMode, HeatRamp};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`PlaybackConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `batch_size` is zero.
    BatchSizeZero,
    /// `prefetch_fraction` is NaN, infinite, or outside `[0, 1]`.
    InvalidPrefetchFraction {
        /// The invalid value.
        value: f64,
    },
    /// The heat ramp saturates at zero, which would divide by zero.
    HeatSaturationZero,
    /// `min_interval` is zero.
    ZeroInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchSizeZero => write!(f, "batch_size must be at least 1"),
            Self::InvalidPrefetchFraction { value } => {
                write!(f, "prefetch_fraction must be finite and in [0, 1], got {value}")
            }
            Self::HeatSaturationZero => write!(f, "heat saturation must be at least 1"),
            Self::ZeroInterval => write!(f, "min_interval must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

// ── PlaybackConfig ─────────────────────────────────────────────────

/// Tunables for a playback session.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackConfig {
    /// Frames requested per refill. Default: 100.
    pub batch_size: usize,
    /// Fraction of `batch_size` remaining in the window at which a
    /// refill is issued. Default: 0.25.
    pub prefetch_fraction: f64,
    /// Halt autoplay on the first reporting cycle. Default: false.
    pub stop_on_report: bool,
    /// Node colouring mode. Default: [`DrawMode::Discrete`].
    pub mode: DrawMode,
    /// Heat-mode colour ramp. Default: saturates at 255 activations.
    pub heat: HeatRamp,
    /// Discrete-mode colour that marks a node as active and lights its
    /// outgoing edges. Default: `rgb(0,255,0)`.
    pub active_node_color: Rgb,
    /// Colour given to edges leaving an active node. Default: `#00ff00`.
    pub active_edge_color: Rgb,
    /// Autoplay interval at speed zero. Default: 1 ms.
    pub min_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            prefetch_fraction: 0.25,
            stop_on_report: false,
            mode: DrawMode::Discrete,
            heat: HeatRamp::default(),
            active_node_color: Rgb::GREEN,
            active_edge_color: Rgb::GREEN,
            min_interval: Duration::from_millis(1),
        }
    }
}

impl PlaybackConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::BatchSizeZero);
        }
        if !self.prefetch_fraction.is_finite() || !(0.0..=1.0).contains(&self.prefetch_fraction) {
            return Err(ConfigError::InvalidPrefetchFraction {
                value: self.prefetch_fraction,
            });
        }
        if self.heat.saturation == 0 {
            return Err(ConfigError::HeatSaturationZero);
        }
        if self.min_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
