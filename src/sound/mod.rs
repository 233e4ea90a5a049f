//! Sound playback system for the Repeat Timer.
//!
//! This module provides the audible side of the timer:
//!
//! - A catalog of selectable alert sounds
//! - A fixed completion cue
//! - Volume validated at the input boundary
//! - Non-blocking playback with a synthesized fallback tone
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ AlertDispatcher  │ ← Used by the timer engine
//! └────────┬─────────┘
//!          │ SoundSource + Volume
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundPlayer    │────▶│   Audio thread   │
//! │ (RodioSoundPlayer│     │  (rodio stream)  │
//! │  or mock)        │     └──────────────────┘
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use repeat_timer::sound::{AlertDispatcher, RodioSoundPlayer, SoundCatalog, SoundPlayer, Volume};
//!
//! let player: Arc<dyn SoundPlayer> = Arc::new(RodioSoundPlayer::new(false).expect("audio init"));
//! let mut alerts = AlertDispatcher::new(Some(player), SoundCatalog::default());
//! alerts.set_volume(Volume::new(0.8).expect("valid volume"));
//! alerts.play_alert().expect("playback failed");
//! ```

mod alert;
mod error;
mod player;
mod source;
mod volume;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use alert::{AlertCue, AlertDispatcher};
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{
    default_sounds_dir, find_sound, SoundCatalog, SoundEntry, SoundSource, Tone,
    COMPLETION_SOUND_ID, DEFAULT_SOUND_ID, SOUND_CATALOG,
};
pub use volume::Volume;

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer: Send + Sync {
    /// Plays a sound from the given source at the given volume.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource, volume: Volume) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables sound playback.
    fn enable(&self);

    /// Disables sound playback.
    fn disable(&self);
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource, volume: Volume) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source, volume)
    }

    fn is_available(&self) -> bool {
        RodioSoundPlayer::is_available(self)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }

    fn enable(&self) {
        RodioSoundPlayer::enable(self)
    }

    fn disable(&self) {
        RodioSoundPlayer::disable(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<(SoundSource, Volume)>>,
    available: AtomicBool,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            disabled: AtomicBool::new(false),
            should_fail: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> MutexGuard<'_, Vec<(SoundSource, Volume)>> {
        self.play_calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    /// Number of plays of the named sound.
    #[must_use]
    pub fn play_count_of(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(source, _)| source.name() == name)
            .count()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<(SoundSource, Volume)> {
        self.calls().clone()
    }

    /// Names of the played sounds, in order.
    #[must_use]
    pub fn played_names(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(source, _)| source.name().to_string())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource, volume: Volume) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.calls().push((source.clone(), volume));
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _: fn(bool) -> Result<RodioSoundPlayer, SoundError> = RodioSoundPlayer::new;
        let _: fn(&str) -> Option<&'static SoundEntry> = find_sound;
        let _: fn(f32) -> Result<Volume, SoundError> = Volume::new;
    }

    #[test]
    fn test_mock_records_calls() {
        let mock = MockSoundPlayer::new();
        let source = SoundSource::tone("beep", Tone::ALERT);

        mock.play(&source, Volume::MAX).unwrap();
        mock.play(&source, Volume::MIN).unwrap();

        assert_eq!(mock.play_count(), 2);
        assert_eq!(mock.play_count_of("beep"), 2);
        assert_eq!(mock.played_names(), vec!["beep", "beep"]);
        assert_eq!(mock.get_play_calls()[1].1, Volume::MIN);

        mock.clear_calls();
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockSoundPlayer::new();
        mock.set_should_fail(true);

        let result = mock.play(&SoundSource::tone("beep", Tone::ALERT), Volume::default());
        assert!(matches!(result, Err(SoundError::PlaybackError(_))));
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_disabled_skips() {
        let mock = MockSoundPlayer::new();
        mock.disable();
        assert!(mock.is_disabled());

        mock.play(&SoundSource::tone("beep", Tone::ALERT), Volume::default())
            .unwrap();
        assert_eq!(mock.play_count(), 0);

        mock.enable();
        assert!(!mock.is_disabled());
    }

    #[test]
    fn test_mock_availability() {
        let mock = MockSoundPlayer::new();
        assert!(mock.is_available());
        mock.set_available(false);
        assert!(!mock.is_available());
    }
}
