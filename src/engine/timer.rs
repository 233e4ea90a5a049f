//! Timer engine for the Repeat Timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running ⇄ Paused → Completed)
//! - Remaining time derived from an absolute end instant
//! - Cycle boundaries resolved by the repeat scheduler
//! - Alert dispatch and event firing
//!
//! The engine never sleeps or spawns. Every method takes the current instant
//! explicitly, and [`super::TimerController`] drives [`TimerEngine::tick`]
//! from a single loop task.

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::countdown::{ClockAnchor, Countdown};
use super::error::TimerError;
use super::schedule::{self, CycleDecision};
use crate::sound::{AlertCue, AlertDispatcher, SoundError, Volume};
use crate::types::{ControllerSnapshot, RunState, RunSummary, TimerConfig};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A run started
    Started {
        /// Identifier of the run
        run_id: Uuid,
        /// Per-cycle duration
        duration_seconds: u64,
        /// Number of cycles in the run
        total_cycles: u32,
    },
    /// The displayed remaining time changed
    Tick {
        /// Remaining seconds in the current cycle
        remaining_seconds: u64,
        /// Zero-based cycle index
        cycle_index: u32,
    },
    /// A cycle reached zero and its alert was dispatched
    CycleCompleted {
        /// Zero-based index of the cycle that ended
        cycle_index: u32,
        /// Number of cycles in the run
        total_cycles: u32,
    },
    /// The final cycle ended
    Completed {
        /// Report of the finished run
        summary: RunSummary,
    },
    /// Timer paused
    Paused {
        /// Remaining seconds frozen at the pause
        remaining_seconds: u64,
    },
    /// Timer resumed
    Resumed {
        /// Remaining seconds at the resume
        remaining_seconds: u64,
    },
    /// Timer stopped
    Stopped,
    /// A sound could not be played; the run continues
    AlertFailed {
        /// Which cue failed
        cue: AlertCue,
        /// Error description
        message: String,
    },
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The current cycle is still counting down
    Continue,
    /// A cycle ended and the next one started
    CycleAdvanced,
    /// The final cycle ended
    Finished,
    /// The tick belongs to no live, running run
    Inactive,
}

impl TickOutcome {
    /// Returns true if the loop that produced this tick should stop.
    pub fn ends_loop(&self) -> bool {
        matches!(self, TickOutcome::Finished | TickOutcome::Inactive)
    }
}

// ============================================================================
// TimerRun
// ============================================================================

/// State of the run in progress.
#[derive(Debug, Clone)]
struct TimerRun {
    id: Uuid,
    countdown: Countdown,
    cycle_index: u32,
    clock: ClockAnchor,
    schedule: RunSummary,
    last_reported: u64,
}

impl TimerRun {
    fn predicted_end_of_cycle(&self, now: Instant) -> DateTime<Local> {
        self.clock.wall_at(self.countdown.end_instant(now))
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages the countdown state and events.
pub struct TimerEngine {
    /// Configuration used by the current and future cycles
    config: TimerConfig,
    /// Current run state
    state: RunState,
    /// Run in progress (Running or Paused)
    run: Option<TimerRun>,
    /// Summary of the last completed run
    summary: Option<RunSummary>,
    /// Sound output
    alerts: AlertDispatcher,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a new TimerEngine with the given configuration, alerts and
    /// event channel.
    pub fn new(
        config: TimerConfig,
        alerts: AlertDispatcher,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            config,
            state: RunState::Idle,
            run: None,
            summary: None,
            alerts,
            event_tx,
        }
    }

    /// Starts a new run with the given per-cycle duration.
    ///
    /// Any previous run or summary is discarded. `wall` is the local time
    /// matching `now` and labels the alarm schedule.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::ZeroDuration` and leaves the state untouched if
    /// `duration_seconds` is zero.
    pub fn start(
        &mut self,
        duration_seconds: u64,
        now: Instant,
        wall: DateTime<Local>,
    ) -> Result<Uuid, TimerError> {
        if duration_seconds == 0 {
            return Err(TimerError::ZeroDuration);
        }

        self.config.duration_seconds = duration_seconds;
        self.summary = None;

        let total_cycles = self.config.total_cycles();
        let run = TimerRun {
            id: Uuid::new_v4(),
            countdown: Countdown::start(now, Duration::from_secs(duration_seconds)),
            cycle_index: 0,
            clock: ClockAnchor::new(now, wall),
            schedule: RunSummary::schedule(wall, duration_seconds, total_cycles),
            last_reported: duration_seconds,
        };
        let run_id = run.id;
        self.run = Some(run);
        self.state = RunState::Running;

        info!(
            "Timer started: {}s x {} (run {})",
            duration_seconds, total_cycles, run_id
        );
        self.emit(TimerEvent::Started {
            run_id,
            duration_seconds,
            total_cycles,
        });

        Ok(run_id)
    }

    /// Starts a new run with the configured per-cycle duration.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::ZeroDuration` if no duration is configured.
    pub fn restart(&mut self, now: Instant, wall: DateTime<Local>) -> Result<Uuid, TimerError> {
        self.start(self.config.duration_seconds, now, wall)
    }

    /// Pauses the timer, freezing the remaining time.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` if the timer is not running.
    pub fn pause(&mut self, now: Instant) -> Result<(), TimerError> {
        let run = match (self.state, self.run.as_mut()) {
            (RunState::Running, Some(run)) => run,
            _ => return Err(TimerError::NotRunning),
        };

        run.countdown = run.countdown.pause(now);
        let remaining_seconds = run.countdown.remaining_seconds(now);
        self.state = RunState::Paused;

        info!("Timer paused with {}s left", remaining_seconds);
        self.emit(TimerEvent::Paused { remaining_seconds });
        Ok(())
    }

    /// Resumes a paused timer under a fresh run id.
    ///
    /// The current cycle ends `remaining` after `now`; predicted alarms of
    /// this and later cycles move accordingly.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotPaused` if the timer is not paused.
    pub fn resume(&mut self, now: Instant) -> Result<Uuid, TimerError> {
        let run = match (self.state, self.run.as_mut()) {
            (RunState::Paused, Some(run)) => run,
            _ => return Err(TimerError::NotPaused),
        };

        run.id = Uuid::new_v4();
        run.countdown = run.countdown.resume(now);
        let next_alarm = run.predicted_end_of_cycle(now);
        run.schedule.reproject(
            run.cycle_index,
            next_alarm,
            self.config.duration_seconds,
            self.config.total_cycles(),
        );
        let run_id = run.id;
        let remaining_seconds = run.countdown.remaining_seconds(now);
        self.state = RunState::Running;

        info!("Timer resumed with {}s left (run {})", remaining_seconds, run_id);
        self.emit(TimerEvent::Resumed { remaining_seconds });
        Ok(run_id)
    }

    /// Stops the timer and clears the run and the last summary.
    ///
    /// Returns true if there was anything to stop.
    pub fn stop(&mut self) -> bool {
        let was_idle = self.state == RunState::Idle;

        self.run = None;
        self.summary = None;
        self.state = RunState::Idle;

        if was_idle {
            debug!("Stop requested while idle");
            return false;
        }

        info!("Timer stopped");
        self.emit(TimerEvent::Stopped);
        true
    }

    /// Re-evaluates the countdown of run `run_id` at `now`.
    ///
    /// Ticks for a run that is no longer current, or is paused, have no
    /// effect.
    pub fn tick(&mut self, run_id: Uuid, now: Instant) -> TickOutcome {
        let run = match self.run.as_mut() {
            Some(run) if run.id == run_id && self.state == RunState::Running => run,
            _ => {
                debug!("Ignoring tick for inactive run {}", run_id);
                return TickOutcome::Inactive;
            }
        };

        if !run.countdown.is_due(now) {
            let remaining_seconds = run.countdown.remaining_seconds(now);
            if remaining_seconds != run.last_reported {
                run.last_reported = remaining_seconds;
                let cycle_index = run.cycle_index;
                self.emit(TimerEvent::Tick {
                    remaining_seconds,
                    cycle_index,
                });
            }
            return TickOutcome::Continue;
        }

        self.complete_cycle(now)
    }

    /// Handles the end of the current cycle.
    fn complete_cycle(&mut self, now: Instant) -> TickOutcome {
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Inactive;
        };

        let cycle_index = run.cycle_index;
        let total_cycles = self.config.total_cycles().max(cycle_index + 1);
        let fired_at = run.clock.wall_at(now);
        run.schedule.record_alarm(cycle_index, fired_at);

        let decision = schedule::decide(&self.config, cycle_index);
        if let CycleDecision::Continue { next_cycle } = decision {
            let duration_seconds = self.config.duration_seconds;
            run.cycle_index = next_cycle;
            run.countdown = Countdown::start(now, Duration::from_secs(duration_seconds));
            run.last_reported = duration_seconds;
        }

        self.dispatch(AlertCue::Cycle);
        self.emit(TimerEvent::CycleCompleted {
            cycle_index,
            total_cycles,
        });

        match decision {
            CycleDecision::Continue { next_cycle } => {
                info!("Cycle {}/{} done, next cycle started", next_cycle, total_cycles);
                TickOutcome::CycleAdvanced
            }
            CycleDecision::Finish => {
                self.dispatch(AlertCue::Completion);
                self.finish(fired_at);
                TickOutcome::Finished
            }
        }
    }

    /// Moves to Completed and publishes the summary.
    fn finish(&mut self, at: DateTime<Local>) {
        let Some(run) = self.run.take() else {
            return;
        };

        let mut summary = run.schedule;
        summary.finish(at);
        self.summary = Some(summary.clone());
        self.state = RunState::Completed;

        info!("Timer completed after {} alarm(s)", summary.alarms.len());
        self.emit(TimerEvent::Completed { summary });
    }

    /// Replaces the configuration.
    ///
    /// A run in progress keeps its current cycle; the new duration and
    /// cycle count apply from the next boundary on, and the predicted
    /// alarms are recomputed.
    pub fn set_config(&mut self, config: TimerConfig, now: Instant) {
        self.config = config;

        if let Some(run) = self.run.as_mut() {
            let next_alarm = run.predicted_end_of_cycle(now);
            run.schedule.reproject(
                run.cycle_index,
                next_alarm,
                config.duration_seconds,
                config.total_cycles(),
            );
        }

        debug!("Configuration updated: {:?}", self.config);
    }

    /// Selects the cycle-boundary sound.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::UnknownSound` if the name is not in the catalog.
    pub fn set_selected_sound(&mut self, name: &str) -> Result<(), SoundError> {
        self.alerts.set_selected_sound(name)
    }

    /// Sets the alert volume.
    pub fn set_volume(&mut self, volume: Volume) {
        self.alerts.set_volume(volume);
    }

    /// Plays the selected sound once.
    ///
    /// # Errors
    ///
    /// Returns the player's error.
    pub fn preview_sound(&self) -> Result<(), SoundError> {
        self.alerts.preview()
    }

    /// Returns the observable state at `now`.
    ///
    /// A running cycle reports at least one second: it only reaches 0 on the
    /// tick that ends it.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> ControllerSnapshot {
        let remaining_seconds = match (&self.run, self.state) {
            (Some(run), RunState::Running) => run.countdown.remaining_seconds(now).max(1),
            (Some(run), _) => run.countdown.remaining_seconds(now),
            (None, _) => 0,
        };

        ControllerSnapshot {
            run_state: self.state,
            remaining_seconds,
            cycle_index: self.run.as_ref().map_or(0, |run| run.cycle_index),
            total_cycles: self.config.total_cycles(),
            config: self.config,
            predicted_end: self.run.as_ref().map(|run| run.schedule.predicted_end),
            summary: self.summary.clone(),
        }
    }

    /// Returns the current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the id of the run in progress.
    pub fn run_id(&self) -> Option<Uuid> {
        self.run.as_ref().map(|run| run.id)
    }

    /// Returns the summary of the last completed run.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Returns the alert dispatcher.
    pub fn alerts(&self) -> &AlertDispatcher {
        &self.alerts
    }

    fn dispatch(&self, cue: AlertCue) {
        let result = match cue {
            AlertCue::Cycle => self.alerts.play_alert(),
            AlertCue::Completion => self.alerts.play_completion(),
            AlertCue::Preview => self.alerts.preview(),
        };

        if let Err(e) = result {
            warn!("Failed to play {} sound: {}", cue.as_str(), e);
            self.emit(TimerEvent::AlertFailed {
                cue,
                message: e.to_string(),
            });
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No event receiver, event dropped");
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("run", &self.run)
            .field("alerts", &self.alerts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
