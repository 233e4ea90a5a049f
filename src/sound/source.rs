//! Sound sources and the alert sound catalog.
//!
//! Each selectable cue maps to an audio file under the sounds directory.
//! A synthesized tone stands in whenever a file cannot be played.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Identifier of the cue that marks final completion.
pub const COMPLETION_SOUND_ID: &str = "done-voice";

/// Identifier of the cue selected by default.
pub const DEFAULT_SOUND_ID: &str = "wood-knock";

/// A catalog entry: identifier, display label, file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEntry {
    /// Stable identifier used on the command line
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// File name inside the sounds directory
    pub file: &'static str,
}

/// Every cue the timer knows about.
pub const SOUND_CATALOG: &[SoundEntry] = &[
    SoundEntry { id: "wood-knock", label: "Wood Knock", file: "wood-door-knock.mp3" },
    SoundEntry { id: "guitar-alert", label: "Guitar Alert", file: "guitar-alert.mp3" },
    SoundEntry { id: "gaming-lock", label: "Gaming Lock", file: "gaming-lock.mp3" },
    SoundEntry { id: "correct-tone", label: "Correct Tone", file: "correct-tone.mp3" },
    SoundEntry { id: "magic-ring", label: "Magic Ring", file: "magic-ring.mp3" },
    SoundEntry { id: "church-bell", label: "Church Bell", file: "church-bell.mp3" },
    SoundEntry { id: "done-voice", label: "Done Voice", file: "done-woman-voice.mp3" },
];

/// Looks up a catalog entry by identifier or label, case-insensitively.
#[must_use]
pub fn find_sound(name: &str) -> Option<&'static SoundEntry> {
    SOUND_CATALOG
        .iter()
        .find(|e| e.id.eq_ignore_ascii_case(name) || e.label.eq_ignore_ascii_case(name))
}

// ============================================================================
// Tone
// ============================================================================

/// A synthesized sine tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in hertz
    pub frequency_hz: f32,
    /// Length in milliseconds
    pub duration_ms: u64,
}

impl Tone {
    /// Short high beep used at cycle boundaries.
    pub const ALERT: Tone = Tone {
        frequency_hz: 880.0,
        duration_ms: 200,
    };

    /// Longer low beep used at final completion.
    pub const COMPLETION: Tone = Tone {
        frequency_hz: 523.25,
        duration_ms: 600,
    };
}

// ============================================================================
// SoundSource
// ============================================================================

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Catalog identifier (e.g., "wood-knock").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
        /// Tone played if the file cannot be.
        fallback: Tone,
    },
    /// A synthesized tone.
    Tone {
        /// Name for logging.
        name: String,
        /// Tone parameters.
        tone: Tone,
    },
}

impl SoundSource {
    /// Creates a new file sound source with the alert tone as fallback.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
            fallback: Tone::ALERT,
        }
    }

    /// Creates a new tone sound source.
    #[must_use]
    pub fn tone(name: impl Into<String>, tone: Tone) -> Self {
        Self::Tone {
            name: name.into(),
            tone,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Tone { name, .. } => name,
        }
    }

    /// Returns true if this source is backed by a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }

    /// Returns the tone played when this source cannot be decoded.
    #[must_use]
    pub fn fallback_tone(&self) -> Tone {
        match self {
            Self::File { fallback, .. } => *fallback,
            Self::Tone { tone, .. } => *tone,
        }
    }
}

// ============================================================================
// SoundCatalog
// ============================================================================

/// Resolves catalog identifiers to playable sources under a sounds directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCatalog {
    sounds_dir: PathBuf,
}

impl SoundCatalog {
    /// Creates a catalog rooted at `sounds_dir`.
    #[must_use]
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
        }
    }

    /// Returns the directory the catalog reads from.
    #[must_use]
    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    /// Resolves a cue by identifier or label.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::UnknownSound` if the name is not in the catalog.
    pub fn source(&self, name: &str) -> Result<SoundSource, SoundError> {
        let entry = find_sound(name).ok_or_else(|| SoundError::UnknownSound(name.to_string()))?;
        Ok(self.source_for(entry))
    }

    /// Resolves the fixed completion cue.
    #[must_use]
    pub fn completion_source(&self) -> SoundSource {
        match find_sound(COMPLETION_SOUND_ID) {
            Some(entry) => SoundSource::File {
                name: entry.id.to_string(),
                path: self.sounds_dir.join(entry.file),
                fallback: Tone::COMPLETION,
            },
            None => SoundSource::tone(COMPLETION_SOUND_ID, Tone::COMPLETION),
        }
    }

    /// Returns every catalog entry with its resolved path and whether the
    /// file exists.
    #[must_use]
    pub fn list(&self) -> Vec<(&'static SoundEntry, PathBuf, bool)> {
        SOUND_CATALOG
            .iter()
            .map(|entry| {
                let path = self.sounds_dir.join(entry.file);
                let exists = path.is_file();
                (entry, path, exists)
            })
            .collect()
    }

    fn source_for(&self, entry: &SoundEntry) -> SoundSource {
        SoundSource::file(entry.id, self.sounds_dir.join(entry.file))
    }
}

impl Default for SoundCatalog {
    fn default() -> Self {
        Self::new(default_sounds_dir())
    }
}

/// Default sounds directory: `<data_dir>/repeat-timer/sounds`, or `./sounds`
/// when the platform has no data directory.
#[must_use]
pub fn default_sounds_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("repeat-timer").join("sounds"))
        .unwrap_or_else(|| PathBuf::from("sounds"))
}
