//! Repeat Timer Library
//!
//! This library provides the core functionality for the Repeat Timer CLI.
//! It includes:
//! - Duration parsing and formatting, with preset durations
//! - Countdown engine and repeat scheduler
//! - Async controller owning the single tick loop
//! - Alert sounds with a synthesized fallback
//! - Persisted theme preference
//! - CLI command parsing and display utilities

pub mod cli;
pub mod duration;
pub mod engine;
pub mod preferences;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{AlarmRecord, ControllerSnapshot, RepeatCount, RunState, RunSummary, TimerConfig};

// Re-export engine types
pub use engine::{TimerController, TimerEngine, TimerError, TimerEvent};

// Re-export sound types
pub use sound::{
    try_create_player, AlertDispatcher, MockSoundPlayer, RodioSoundPlayer, SoundCatalog,
    SoundError, SoundPlayer, SoundSource, Volume,
};

// Re-export preference types
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, Preferences,
    Theme,
};
