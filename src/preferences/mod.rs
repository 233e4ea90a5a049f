//! Persisted user preferences.
//!
//! The display theme is the only state that survives a restart. The timer
//! core never touches storage directly: callers hand it a
//! [`PreferenceStore`], either the JSON file store or the in-memory one.

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::PreferenceError;

/// File name of the preference file inside the config directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "repeat-timer";

// ============================================================================
// Theme / Preferences
// ============================================================================

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background
    #[default]
    Dark,
    /// Light background
    Light,
}

impl Theme {
    /// Returns the string representation of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Returns the other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Returns true for the dark theme.
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// User preferences that persist across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Display theme
    #[serde(default)]
    pub theme: Theme,
}

// ============================================================================
// PreferenceStore
// ============================================================================

/// Storage for [`Preferences`].
pub trait PreferenceStore: Send + Sync {
    /// Loads the stored preferences, or defaults if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if stored preferences exist but cannot be read.
    fn load(&self) -> Result<Preferences, PreferenceError>;

    /// Stores the preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be written.
    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError>;

    /// Returns the stored theme.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    fn theme(&self) -> Result<Theme, PreferenceError> {
        Ok(self.load()?.theme)
    }

    /// Stores a new theme, keeping other preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    fn set_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        let mut preferences = self.load()?;
        preferences.theme = theme;
        self.save(&preferences)
    }

    /// Switches to the other theme and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    fn toggle_theme(&self) -> Result<Theme, PreferenceError> {
        let theme = self.theme()?.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}

// ============================================================================
// FilePreferenceStore
// ============================================================================

/// Preferences stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at `<config_dir>/repeat-timer/preferences.json`.
    ///
    /// # Errors
    ///
    /// Returns `PreferenceError::ConfigDirNotFound` if the platform has no
    /// config directory.
    pub fn default_location() -> Result<Self, PreferenceError> {
        let config_dir = dirs::config_dir().ok_or(PreferenceError::ConfigDirNotFound)?;
        Ok(Self::new(config_dir.join(APP_DIR).join(PREFERENCES_FILE)))
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        if !self.path.exists() {
            debug!("No preference file at {}, using defaults", self.path.display());
            return Ok(Preferences::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| PreferenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, content).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// MemoryPreferenceStore
// ============================================================================

/// Preferences kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    preferences: Mutex<Preferences>,
    save_count: Mutex<usize>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences: Mutex::new(preferences),
            save_count: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        Ok(*self.preferences.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        *self.preferences.lock().unwrap_or_else(PoisonError::into_inner) = *preferences;
        *self.save_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
