//! Alert dispatch for cycle boundaries and final completion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::SoundError;
use super::source::{SoundCatalog, SoundSource, Tone, DEFAULT_SOUND_ID};
use super::volume::Volume;
use super::SoundPlayer;

/// Which cue is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCue {
    /// The selected sound, at every cycle boundary
    Cycle,
    /// The fixed "done" sound, after the final cycle
    Completion,
    /// The selected sound, played on request
    Preview,
}

impl AlertCue {
    /// Returns the string representation of the cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCue::Cycle => "cycle",
            AlertCue::Completion => "completion",
            AlertCue::Preview => "preview",
        }
    }
}

/// Plays the timer's audible cues at the configured volume.
///
/// Without a player every cue is a silent success, so a machine without
/// audio still runs the timer.
pub struct AlertDispatcher {
    player: Option<Arc<dyn SoundPlayer>>,
    catalog: SoundCatalog,
    selected: SoundSource,
    volume: Volume,
}

impl AlertDispatcher {
    /// Creates a dispatcher with the default sound selected at half volume.
    #[must_use]
    pub fn new(player: Option<Arc<dyn SoundPlayer>>, catalog: SoundCatalog) -> Self {
        let selected = catalog
            .source(DEFAULT_SOUND_ID)
            .unwrap_or_else(|_| SoundSource::tone(DEFAULT_SOUND_ID, Tone::ALERT));
        Self {
            player,
            catalog,
            selected,
            volume: Volume::default(),
        }
    }

    /// Creates a dispatcher that never produces sound.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(None, SoundCatalog::default())
    }

    /// Selects the cycle-boundary sound by catalog identifier or label.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::UnknownSound` and keeps the previous selection
    /// if the name is not in the catalog.
    pub fn set_selected_sound(&mut self, name: &str) -> Result<(), SoundError> {
        self.selected = self.catalog.source(name)?;
        debug!("Selected sound: {}", self.selected.name());
        Ok(())
    }

    /// Returns the identifier of the selected sound.
    #[must_use]
    pub fn selected_sound(&self) -> &str {
        self.selected.name()
    }

    /// Sets the volume for every subsequent cue.
    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    /// Returns the current volume.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Plays the selected sound for a cycle boundary.
    ///
    /// # Errors
    ///
    /// Returns the player's error; the caller decides how to report it.
    pub fn play_alert(&self) -> Result<(), SoundError> {
        self.play(AlertCue::Cycle, &self.selected)
    }

    /// Plays the fixed completion sound, regardless of the selection.
    ///
    /// # Errors
    ///
    /// Returns the player's error; the caller decides how to report it.
    pub fn play_completion(&self) -> Result<(), SoundError> {
        self.play(AlertCue::Completion, &self.catalog.completion_source())
    }

    /// Plays the selected sound once, outside of any run.
    ///
    /// # Errors
    ///
    /// Returns the player's error.
    pub fn preview(&self) -> Result<(), SoundError> {
        self.play(AlertCue::Preview, &self.selected)
    }

    fn play(&self, cue: AlertCue, source: &SoundSource) -> Result<(), SoundError> {
        match &self.player {
            Some(player) => {
                debug!("Dispatching {} cue: {} at {}", cue.as_str(), source.name(), self.volume);
                player.play(source, self.volume)
            }
            None => {
                debug!("No audio player, skipping {} cue", cue.as_str());
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("has_player", &self.player.is_some())
            .field("selected", &self.selected.name())
            .field("volume", &self.volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::source::COMPLETION_SOUND_ID;
    use crate::sound::MockSoundPlayer;

    fn dispatcher_with_mock() -> (AlertDispatcher, Arc<MockSoundPlayer>) {
        let mock = Arc::new(MockSoundPlayer::new());
        let dispatcher = AlertDispatcher::new(
            Some(mock.clone() as Arc<dyn SoundPlayer>),
            SoundCatalog::new("/sounds"),
        );
        (dispatcher, mock)
    }

    #[test]
    fn test_default_selection() {
        let (dispatcher, _mock) = dispatcher_with_mock();
        assert_eq!(dispatcher.selected_sound(), DEFAULT_SOUND_ID);
        assert_eq!(dispatcher.volume(), Volume::default());
    }

    #[test]
    fn test_play_alert_uses_selection_and_volume() {
        let (mut dispatcher, mock) = dispatcher_with_mock();
        dispatcher.set_selected_sound("church-bell").unwrap();
        dispatcher.set_volume(Volume::new(0.8).unwrap());

        dispatcher.play_alert().unwrap();

        let calls = mock.get_play_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.name(), "church-bell");
        assert_eq!(calls[0].1.get(), 0.8);
    }

    #[test]
    fn test_play_completion_ignores_selection() {
        let (mut dispatcher, mock) = dispatcher_with_mock();
        dispatcher.set_selected_sound("magic-ring").unwrap();

        dispatcher.play_completion().unwrap();

        let calls = mock.get_play_calls();
        assert_eq!(calls[0].0.name(), COMPLETION_SOUND_ID);
    }

    #[test]
    fn test_unknown_sound_keeps_selection() {
        let (mut dispatcher, _mock) = dispatcher_with_mock();
        dispatcher.set_selected_sound("gaming-lock").unwrap();

        let err = dispatcher.set_selected_sound("kazoo").unwrap_err();

        assert!(err.is_input_error());
        assert_eq!(dispatcher.selected_sound(), "gaming-lock");
    }

    #[test]
    fn test_player_failure_is_returned() {
        let (dispatcher, mock) = dispatcher_with_mock();
        mock.set_should_fail(true);

        assert!(dispatcher.play_alert().is_err());
        assert!(dispatcher.preview().is_err());
    }

    #[test]
    fn test_silent_dispatcher_succeeds() {
        let dispatcher = AlertDispatcher::silent();
        assert!(dispatcher.play_alert().is_ok());
        assert!(dispatcher.play_completion().is_ok());
    }

    #[test]
    fn test_cue_as_str() {
        assert_eq!(AlertCue::Cycle.as_str(), "cycle");
        assert_eq!(AlertCue::Completion.as_str(), "completion");
        assert_eq!(AlertCue::Preview.as_str(), "preview");
    }
}
