//! Autoplay state machine.
//!
//! ```text
//!            play()                      RefillPending
//!   Idle ─────────────> Running ─────────────────────> WaitingOnCache
//!    ^                   │  ^                                │
//!    │ stop() / report / │  └────── refill lands, step ──────┘
//!    │ end of input      │
//!    └───────────────────┘
//! ```
//!
//! The controller owns no timer. Callers pass the current [`Instant`] to
//! every method and call [`tick`](PlaybackController::tick) as often as
//! they like; a step happens only once the interval has elapsed. Tests
//! drive it with synthetic instants.

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use strobe_core::{CycleId, GraphSurface, StepError};

use crate::config::PlaybackConfig;
use crate::refill::RefillPort;
use crate::session::{PlaybackSession, StepOutcome};

// ── Direction / Speed ──────────────────────────────────────────────

/// Autoplay direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards later cycles.
    #[default]
    Forward,
    /// Towards earlier cycles.
    Backward,
}

impl Direction {
    /// The step delta for one tick.
    pub fn delta(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Delay between autoplay steps, in seconds, on top of the minimum
/// interval. Zero is the fastest setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Speed(f64);

/// Coarse label for a [`Speed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedTier {
    /// No added delay.
    Fastest,
    /// Up to 0.3 s.
    Fast,
    /// Up to 0.8 s.
    Medium,
    /// Up to 1.8 s.
    Slow,
    /// Anything slower.
    Slowest,
}

impl Speed {
    /// No added delay.
    pub const FASTEST: Speed = Speed(0.0);

    /// Longest accepted delay, in seconds.
    pub const MAX_SECS: f64 = u32::MAX as f64;

    /// A delay of `secs` seconds, within `0.0..=MAX_SECS`.
    pub fn from_secs(secs: f64) -> Result<Self, ControlError> {
        if !(0.0..=Self::MAX_SECS).contains(&secs) {
            return Err(ControlError::InvalidSpeed { value: secs });
        }
        Ok(Self(secs))
    }

    /// The delay in seconds.
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// The delay as a duration.
    pub fn delay(self) -> Duration {
        Duration::from_secs_f64(self.0)
    }

    /// Classify for display.
    pub fn tier(self) -> SpeedTier {
        match self.0 {
            d if d <= 0.0 => SpeedTier::Fastest,
            d if d <= 0.3 => SpeedTier::Fast,
            d if d <= 0.8 => SpeedTier::Medium,
            d if d <= 1.8 => SpeedTier::Slow,
            _ => SpeedTier::Slowest,
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fastest => "Fastest",
            Self::Fast => "Fast",
            Self::Medium => "Medium",
            Self::Slow => "Slow",
            Self::Slowest => "Slowest",
        };
        f.write_str(label)
    }
}

// ── ControlError ───────────────────────────────────────────────────

/// Errors from controller operations.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlError {
    /// Manual movement or a second `play` while autoplay is active.
    AutoplayActive,
    /// A speed that is negative, NaN or infinite.
    InvalidSpeed {
        /// The rejected value.
        value: f64,
    },
    /// The manual step itself failed.
    Step(StepError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoplayActive => write!(f, "autoplay is active; stop it first"),
            Self::InvalidSpeed { value } => {
                write!(f, "speed must be finite and non-negative, got {value}")
            }
            Self::Step(e) => write!(f, "step failed: {e}"),
        }
    }
}

impl Error for ControlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Step(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StepError> for ControlError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

// ── State machine ──────────────────────────────────────────────────

/// Controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ControllerState {
    /// Not playing; manual steps allowed.
    #[default]
    Idle,
    /// Stepping on every due tick.
    Running {
        /// Autoplay direction.
        direction: Direction,
        /// Speed at which playback started.
        speed: Speed,
    },
    /// The last tick hit the end of the window while a refill was in
    /// flight; ticks do nothing until it lands.
    WaitingOnCache {
        /// Autoplay direction.
        direction: Direction,
        /// Speed at which playback started.
        speed: Speed,
    },
}

/// What a [`PlaybackController::tick`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickEvent {
    /// Not playing.
    Idle,
    /// Playing, but the interval has not elapsed.
    NotDue,
    /// One step applied; still playing.
    Stepped(CycleId),
    /// Stopped on a reporting cycle, which is displayed.
    HaltedOnReport(CycleId),
    /// Waiting for a refill.
    Waiting,
    /// Ran off the cached range with nothing to wait for; stopped.
    EndOfInput(StepError),
}

/// Drives a [`PlaybackSession`] on a timer.
#[derive(Clone, Debug)]
pub struct PlaybackController {
    state: ControllerState,
    speed: Speed,
    min_interval: Duration,
    next_due: Option<Instant>,
}

impl PlaybackController {
    /// An idle controller at the fastest speed.
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            state: ControllerState::Idle,
            speed: Speed::FASTEST,
            min_interval: config.min_interval,
            next_due: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Whether autoplay is active (running or waiting).
    pub fn is_playing(&self) -> bool {
        self.state != ControllerState::Idle
    }

    /// Configured speed.
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Time between autoplay steps.
    pub fn interval(&self) -> Duration {
        self.min_interval.saturating_add(self.speed.delay())
    }

    /// When the next step is due, if playing.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Start autoplay. The first step is due immediately.
    pub fn play(&mut self, now: Instant, direction: Direction) -> Result<(), ControlError> {
        if self.is_playing() {
            return Err(ControlError::AutoplayActive);
        }
        self.state = ControllerState::Running {
            direction,
            speed: self.speed,
        };
        self.next_due = Some(now);
        tracing::debug!(
            ?direction,
            interval_ms = u64::try_from(self.interval().as_millis()).unwrap_or(u64::MAX),
            "autoplay started"
        );
        Ok(())
    }

    /// Stop autoplay. Returns whether it was playing.
    ///
    /// Only the timer is cancelled; an in-flight refill still lands on
    /// the next pump.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.is_playing();
        if was_playing {
            tracing::debug!("autoplay stopped");
        }
        self.state = ControllerState::Idle;
        self.next_due = None;
        was_playing
    }

    /// Play if idle, stop if playing. Returns whether it is now playing.
    pub fn toggle(&mut self, now: Instant, direction: Direction) -> bool {
        if self.stop() {
            return false;
        }
        self.play(now, direction).is_ok()
    }

    /// Change speed. Stops autoplay if it is active; returns whether it
    /// did.
    pub fn set_speed(&mut self, speed: Speed) -> bool {
        self.speed = speed;
        self.stop()
    }

    /// Step manually. Rejected while autoplay is active.
    pub fn step<G: GraphSurface, R: RefillPort>(
        &self,
        session: &mut PlaybackSession<G, R>,
        delta: i64,
    ) -> Result<StepOutcome, ControlError> {
        if self.is_playing() {
            return Err(ControlError::AutoplayActive);
        }
        Ok(session.step(delta)?)
    }

    /// Jump manually. Rejected while autoplay is active.
    pub fn jump_to<G: GraphSurface, R: RefillPort>(
        &self,
        session: &mut PlaybackSession<G, R>,
        cycle: CycleId,
    ) -> Result<StepOutcome, ControlError> {
        if self.is_playing() {
            return Err(ControlError::AutoplayActive);
        }
        Ok(session.jump_to(cycle)?)
    }

    /// Advance autoplay if a step is due.
    pub fn tick<G: GraphSurface, R: RefillPort>(
        &mut self,
        now: Instant,
        session: &mut PlaybackSession<G, R>,
    ) -> TickEvent {
        let (direction, speed, waiting) = match self.state {
            ControllerState::Idle => return TickEvent::Idle,
            ControllerState::Running { direction, speed } => (direction, speed, false),
            ControllerState::WaitingOnCache { direction, speed } => (direction, speed, true),
        };
        if self.next_due.is_some_and(|due| now < due) {
            return TickEvent::NotDue;
        }
        self.next_due = Some(now + self.interval());

        let pumped = session.pump();
        let result = match pumped.deferred {
            Some(outcome) => Ok(outcome),
            None if waiting && session.is_refill_in_flight() => return TickEvent::Waiting,
            None => session.step(direction.delta()),
        };

        match result {
            Ok(StepOutcome::Applied(cycle)) => {
                if waiting {
                    tracing::debug!(cycle = cycle.0, "refill landed; autoplay resumed");
                }
                self.state = ControllerState::Running { direction, speed };
                TickEvent::Stepped(cycle)
            }
            Ok(StepOutcome::StoppedOnReport(cycle)) => {
                tracing::debug!(cycle = cycle.0, "autoplay halted on report");
                self.stop();
                TickEvent::HaltedOnReport(cycle)
            }
            Ok(StepOutcome::RefillPending) => {
                tracing::debug!("autoplay waiting on cache");
                self.state = ControllerState::WaitingOnCache { direction, speed };
                TickEvent::Waiting
            }
            Err(e) => {
                tracing::debug!(error = %e, "autoplay reached end of cached input");
                self.stop();
                TickEvent::EndOfInput(e)
            }
        }
    }
}
