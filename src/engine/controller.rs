//! Async driver for the timer engine.
//!
//! [`TimerController`] is the presentation-facing handle. It serializes all
//! access to the [`TimerEngine`] behind a tokio mutex and owns at most one
//! tick-loop task, bound to the id of the run it drives.

use std::sync::{Arc, Weak};

use chrono::Local;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;
use uuid::Uuid;

use super::countdown::TICK_INTERVAL;
use super::error::TimerError;
use super::timer::{TimerEngine, TimerEvent};
use crate::sound::{AlertDispatcher, SoundError, Volume};
use crate::types::{ControllerSnapshot, RepeatCount, RunState, TimerConfig};

// ============================================================================
// TickLoop
// ============================================================================

/// Handle of the live tick-loop task. Dropping it cancels the task.
#[derive(Debug)]
struct TickLoop {
    run_id: Uuid,
    handle: JoinHandle<()>,
}

impl TickLoop {
    fn spawn(inner: &Arc<Mutex<ControllerInner>>, run_id: Uuid) -> Self {
        let weak = Arc::downgrade(inner);
        let handle = tokio::spawn(run_tick_loop(weak, run_id));
        debug!("Tick loop spawned for run {}", run_id);
        Self { run_id, handle }
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_tick_loop(inner: Weak<Mutex<ControllerInner>>, run_id: Uuid) {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        // The controller is gone
        let Some(shared) = inner.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;

        let outcome = guard.engine.tick(run_id, Instant::now());
        if outcome.ends_loop() {
            if guard.ticker.as_ref().is_some_and(|t| t.run_id == run_id) {
                guard.ticker = None;
            }
            debug!("Tick loop for run {} ended: {:?}", run_id, outcome);
            break;
        }
    }
}

// ============================================================================
// TimerController
// ============================================================================

#[derive(Debug)]
struct ControllerInner {
    engine: TimerEngine,
    ticker: Option<TickLoop>,
}

impl ControllerInner {
    /// Replaces the tick loop, cancelling the previous one first.
    fn drive(&mut self, inner: &Arc<Mutex<ControllerInner>>, run_id: Uuid) {
        self.ticker = None;
        self.ticker = Some(TickLoop::spawn(inner, run_id));
    }
}

/// Presentation-facing timer handle.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TimerController {
    inner: Arc<Mutex<ControllerInner>>,
}

impl TimerController {
    /// Creates a controller over a new engine.
    pub fn new(
        config: TimerConfig,
        alerts: AlertDispatcher,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ControllerInner {
                engine: TimerEngine::new(config, alerts, event_tx),
                ticker: None,
            })),
        }
    }

    /// Starts a run of `duration_seconds` per cycle, replacing any run in
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::ZeroDuration` if `duration_seconds` is zero.
    pub async fn start(&self, duration_seconds: u64) -> Result<(), TimerError> {
        let mut guard = self.inner.lock().await;
        let run_id = guard
            .engine
            .start(duration_seconds, Instant::now(), Local::now())?;
        guard.drive(&self.inner, run_id);
        Ok(())
    }

    /// Starts a run with the configured duration.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::ZeroDuration` if no duration is configured.
    pub async fn restart(&self) -> Result<(), TimerError> {
        let mut guard = self.inner.lock().await;
        let run_id = guard.engine.restart(Instant::now(), Local::now())?;
        guard.drive(&self.inner, run_id);
        Ok(())
    }

    /// Pauses the running timer.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` if the timer is not running.
    pub async fn pause(&self) -> Result<(), TimerError> {
        let mut guard = self.inner.lock().await;
        guard.engine.pause(Instant::now())?;
        guard.ticker = None;
        Ok(())
    }

    /// Resumes the paused timer.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotPaused` if the timer is not paused.
    pub async fn resume(&self) -> Result<(), TimerError> {
        let mut guard = self.inner.lock().await;
        let run_id = guard.engine.resume(Instant::now())?;
        guard.drive(&self.inner, run_id);
        Ok(())
    }

    /// Stops the timer. Returns true if there was anything to stop.
    pub async fn stop(&self) -> bool {
        let mut guard = self.inner.lock().await;
        guard.ticker = None;
        guard.engine.stop()
    }

    /// Replaces the configuration.
    ///
    /// A run in progress continues on the same tick loop; the change takes
    /// effect from its next cycle boundary.
    pub async fn set_config(&self, duration_seconds: u64, repeat_enabled: bool, repeat_count: i64) {
        let config = TimerConfig {
            duration_seconds,
            repeat_enabled,
            repeat_count: RepeatCount::clamped(repeat_count),
        };
        self.inner.lock().await.engine.set_config(config, Instant::now());
    }

    /// Applies raw text from the repeat count field.
    ///
    /// Non-numeric text keeps the previous count. Returns the count in
    /// effect afterwards.
    pub async fn set_repeat_count_input(&self, text: &str) -> RepeatCount {
        let mut guard = self.inner.lock().await;
        let mut config = *guard.engine.config();
        config.repeat_count = RepeatCount::parse_input(text, config.repeat_count);
        guard.engine.set_config(config, Instant::now());
        config.repeat_count
    }

    /// Selects the cycle-boundary sound.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::UnknownSound` if the name is not in the catalog.
    pub async fn set_selected_sound(&self, name: &str) -> Result<(), SoundError> {
        self.inner.lock().await.engine.set_selected_sound(name)
    }

    /// Sets the alert volume from raw input.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::InvalidVolume` if `value` is outside `[0.0, 1.0]`.
    pub async fn set_volume(&self, value: f32) -> Result<Volume, SoundError> {
        let volume = Volume::new(value)?;
        self.inner.lock().await.engine.set_volume(volume);
        Ok(volume)
    }

    /// Plays the selected sound once.
    ///
    /// # Errors
    ///
    /// Returns the player's error.
    pub async fn test_sound(&self) -> Result<(), SoundError> {
        self.inner.lock().await.engine.preview_sound()
    }

    /// Returns the observable state.
    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.lock().await.engine.snapshot(Instant::now())
    }

    /// Returns the current run state.
    pub async fn run_state(&self) -> RunState {
        self.inner.lock().await.engine.state()
    }

    /// Returns true while a tick loop is live.
    pub async fn is_ticking(&self) -> bool {
        self.inner
            .lock()
            .await
            .ticker
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }
}

// ============================================================================
// Tests
// ============================================================================
