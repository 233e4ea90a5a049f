//! Countdown arithmetic.
//!
//! Remaining time is always derived from an absolute target instant and the
//! current instant. Nothing here keeps a decrementing counter, so delayed or
//! skipped ticks cannot make the countdown drift.

use chrono::{DateTime, Local, TimeDelta};
use tokio::time::{Duration, Instant};

/// How often the tick loop re-evaluates the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound for end instants; longer countdowns saturate here.
const MAX_COUNTDOWN: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// `now + duration`, saturating instead of overflowing the clock.
fn deadline(now: Instant, duration: Duration) -> Instant {
    now.checked_add(duration.min(MAX_COUNTDOWN)).unwrap_or(now)
}

/// Whole seconds left until `target_end`, rounded half up, never negative.
#[must_use]
pub fn remaining_seconds(target_end: Instant, now: Instant) -> u64 {
    round_seconds(target_end.saturating_duration_since(now))
}

/// Rounds a duration to whole seconds, half up.
#[must_use]
pub fn round_seconds(duration: Duration) -> u64 {
    let millis = duration.as_millis().saturating_add(500) / 1000;
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Position of the current cycle on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Counting towards an absolute end instant
    Running {
        /// When the current cycle ends
        target_end: Instant,
    },
    /// Frozen; the remaining time is kept as a relative duration
    Paused {
        /// Time left in the cycle when it was paused
        remaining: Duration,
    },
}

impl Countdown {
    /// Starts a cycle of `duration` at `now`.
    #[must_use]
    pub fn start(now: Instant, duration: Duration) -> Self {
        Countdown::Running {
            target_end: deadline(now, duration),
        }
    }

    /// Time left in the cycle.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        match *self {
            Countdown::Running { target_end } => target_end.saturating_duration_since(now),
            Countdown::Paused { remaining } => remaining,
        }
    }

    /// Whole seconds left in the cycle.
    #[must_use]
    pub fn remaining_seconds(&self, now: Instant) -> u64 {
        match *self {
            Countdown::Running { target_end } => remaining_seconds(target_end, now),
            Countdown::Paused { remaining } => round_seconds(remaining),
        }
    }

    /// True once the displayed remaining time of a running cycle is 0.
    ///
    /// The boundary is evaluated on the rounded value, so the cycle ends on
    /// the same tick that first reports 0.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        match *self {
            Countdown::Running { target_end } => remaining_seconds(target_end, now) == 0,
            Countdown::Paused { .. } => false,
        }
    }

    /// When the cycle ends if it keeps running from `now`.
    #[must_use]
    pub fn end_instant(&self, now: Instant) -> Instant {
        match *self {
            Countdown::Running { target_end } => target_end,
            Countdown::Paused { remaining } => deadline(now, remaining),
        }
    }

    /// Freezes the countdown, discarding the absolute target.
    #[must_use]
    pub fn pause(self, now: Instant) -> Self {
        Countdown::Paused {
            remaining: self.remaining(now),
        }
    }

    /// Re-anchors a paused countdown at `now`.
    #[must_use]
    pub fn resume(self, now: Instant) -> Self {
        match self {
            Countdown::Paused { remaining } => Countdown::start(now, remaining),
            running => running,
        }
    }

    /// Returns true while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self, Countdown::Paused { .. })
    }
}

/// Pairs a monotonic instant with the wall-clock time it was taken at, so
/// later instants can be labelled with local times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockAnchor {
    instant: Instant,
    wall: DateTime<Local>,
}

impl ClockAnchor {
    /// Creates an anchor from simultaneous readings of both clocks.
    #[must_use]
    pub fn new(instant: Instant, wall: DateTime<Local>) -> Self {
        Self { instant, wall }
    }

    /// Wall-clock time of the anchor itself.
    #[must_use]
    pub fn wall(&self) -> DateTime<Local> {
        self.wall
    }

    /// Wall-clock time corresponding to `instant`.
    #[must_use]
    pub fn wall_at(&self, instant: Instant) -> DateTime<Local> {
        let elapsed = instant.saturating_duration_since(self.instant);
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.wall.checked_add_signed(delta))
            .unwrap_or(self.wall)
    }
}
