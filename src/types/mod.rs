//! Core data types for the Repeat Timer.
//!
//! This module defines the data structures used for:
//! - Run state tracking
//! - Timer configuration with repeat count clamping
//! - Run summaries (predicted and actual alarm instants)
//! - The observable controller snapshot

use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};

// ============================================================================
// RunState
// ============================================================================

/// Represents the current state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run in progress
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown frozen; remaining time held as a relative duration
    Paused,
    /// Final cycle finished; summary available
    Completed,
}

impl RunState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Completed => "completed",
        }
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Returns true if a run exists (running or paused).
    pub fn has_run(&self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }
}

// ============================================================================
// RepeatCount
// ============================================================================

/// Number of cycles in a repeating run, always within `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct RepeatCount(u32);

impl RepeatCount {
    /// Smallest allowed repeat count.
    pub const MIN: u32 = 1;
    /// Largest allowed repeat count.
    pub const MAX: u32 = 100;

    /// Creates a repeat count, clamping into `[1, 100]`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u32)
    }

    /// Interprets raw text from the repeat count field.
    ///
    /// Numeric input is clamped. Anything else leaves `last` in effect.
    #[must_use]
    pub fn parse_input(text: &str, last: RepeatCount) -> Self {
        match text.trim().parse::<i64>() {
            Ok(value) => Self::clamped(value),
            Err(_) => {
                // Digits that overflow i64 are still "too large"
                let trimmed = text.trim();
                if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    Self(Self::MAX)
                } else {
                    last
                }
            }
        }
    }

    /// Returns the count as a plain integer.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RepeatCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<i64> for RepeatCount {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<RepeatCount> for i64 {
    fn from(count: RepeatCount) -> Self {
        i64::from(count.0)
    }
}

impl std::fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Length of one cycle in seconds
    pub duration_seconds: u64,
    /// Whether the countdown repeats
    pub repeat_enabled: bool,
    /// Number of cycles when repeating
    pub repeat_count: RepeatCount,
}

impl TimerConfig {
    /// Creates a single-cycle configuration.
    #[must_use]
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            duration_seconds,
            ..Self::default()
        }
    }

    /// Creates a new configuration with the specified per-cycle duration.
    #[must_use]
    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Creates a new configuration repeating `count` times (clamped).
    #[must_use]
    pub fn with_repeat(mut self, count: i64) -> Self {
        self.repeat_enabled = true;
        self.repeat_count = RepeatCount::clamped(count);
        self
    }

    /// Number of cycles a run with this configuration goes through.
    #[must_use]
    pub fn total_cycles(&self) -> u32 {
        if self.repeat_enabled {
            self.repeat_count.get()
        } else {
            1
        }
    }

    /// Total length of all cycles in seconds.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u64 {
        self.duration_seconds
            .saturating_mul(u64::from(self.total_cycles()))
    }
}

// ============================================================================
// RunSummary
// ============================================================================

/// One alarm of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Zero-based cycle this alarm ends
    pub cycle: u32,
    /// When the alarm was expected to fire
    pub predicted: DateTime<Local>,
    /// When the alarm actually fired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<DateTime<Local>>,
}

/// Report of a run: one alarm per cycle plus the overall span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Local>,
    /// When the last alarm is expected
    pub predicted_end: DateTime<Local>,
    /// When the run actually finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Local>>,
    /// Alarms in cycle order
    pub alarms: Vec<AlarmRecord>,
}

impl RunSummary {
    /// Builds the projected schedule of a run: alarm `i` (1-based) is
    /// predicted at `started_at + i * duration`.
    #[must_use]
    pub fn schedule(started_at: DateTime<Local>, duration_seconds: u64, cycles: u32) -> Self {
        let alarms: Vec<AlarmRecord> = (0..cycles)
            .map(|cycle| AlarmRecord {
                cycle,
                predicted: offset(started_at, duration_seconds, u64::from(cycle) + 1),
                actual: None,
            })
            .collect();
        let predicted_end = alarms.last().map_or(started_at, |a| a.predicted);

        Self {
            started_at,
            predicted_end,
            finished_at: None,
            alarms,
        }
    }

    /// Re-predicts the alarms of `from_cycle` and later cycles: the first
    /// at `next_alarm`, the rest one `duration` apart. The schedule is cut or
    /// extended to `cycles` entries but never drops `from_cycle` itself.
    pub fn reproject(
        &mut self,
        from_cycle: u32,
        next_alarm: DateTime<Local>,
        duration_seconds: u64,
        cycles: u32,
    ) {
        let len = cycles.max(from_cycle + 1);
        self.alarms.truncate(len as usize);
        while (self.alarms.len() as u32) < len {
            self.alarms.push(AlarmRecord {
                cycle: self.alarms.len() as u32,
                predicted: next_alarm,
                actual: None,
            });
        }

        for alarm in self.alarms.iter_mut().filter(|a| a.cycle >= from_cycle) {
            alarm.predicted = offset(next_alarm, duration_seconds, u64::from(alarm.cycle - from_cycle));
        }
        if let Some(last) = self.alarms.last() {
            self.predicted_end = last.predicted;
        }
    }

    /// Records the instant the alarm of `cycle` fired.
    pub fn record_alarm(&mut self, cycle: u32, at: DateTime<Local>) {
        if let Some(alarm) = self.alarms.iter_mut().find(|a| a.cycle == cycle) {
            alarm.actual = Some(at);
        }
    }

    /// Marks the run as finished.
    pub fn finish(&mut self, at: DateTime<Local>) {
        self.finished_at = Some(at);
    }

    /// Returns the predicted alarm instants in order.
    #[must_use]
    pub fn predicted_alarms(&self) -> Vec<DateTime<Local>> {
        self.alarms.iter().map(|a| a.predicted).collect()
    }
}

/// `base + steps * seconds`, or `base` when the result is out of range.
fn offset(base: DateTime<Local>, seconds: u64, steps: u64) -> DateTime<Local> {
    seconds
        .checked_mul(steps)
        .and_then(|total| i64::try_from(total).ok())
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| base.checked_add_signed(delta))
        .unwrap_or(base)
}

// ============================================================================
// ControllerSnapshot
// ============================================================================

/// Read-only view of the controller for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    /// Current run state
    pub run_state: RunState,
    /// Remaining seconds in the current cycle
    pub remaining_seconds: u64,
    /// Zero-based cycle index
    pub cycle_index: u32,
    /// Number of cycles in the run
    pub total_cycles: u32,
    /// Active configuration
    pub config: TimerConfig,
    /// When the last alarm of the current run is expected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_end: Option<DateTime<Local>>,
    /// Summary of the last completed run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

impl ControllerSnapshot {
    /// Returns the "current/total" cycle label shown while repeating.
    #[must_use]
    pub fn cycle_label(&self) -> Option<String> {
        if self.config.repeat_enabled && self.run_state.has_run() {
            Some(format!("{}/{}", self.cycle_index + 1, self.total_cycles))
        } else {
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
