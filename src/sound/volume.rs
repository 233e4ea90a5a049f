//! Playback volume.

use serde::{Deserialize, Serialize};

use super::error::SoundError;

/// Playback volume applied uniformly to every cue.
///
/// Always within `[0.0, 1.0]`; range checks happen when the value is
/// constructed, so players never see an out-of-range volume.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Volume(f32);

impl Volume {
    /// Silence.
    pub const MIN: Volume = Volume(0.0);
    /// Full volume.
    pub const MAX: Volume = Volume(1.0);

    /// Creates a volume, rejecting values outside `[0.0, 1.0]` and NaN.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::InvalidVolume` for out-of-range input.
    pub fn new(value: f32) -> Result<Self, SoundError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SoundError::InvalidVolume(value.to_string()))
        }
    }

    /// Creates a volume, clamping into `[0.0, 1.0]`. NaN becomes silence.
    #[must_use]
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the raw gain.
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Returns the volume as a rounded percentage.
    #[must_use]
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(0.5)
    }
}

impl TryFrom<f32> for Volume {
    type Error = SoundError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Volume> for f32 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_half() {
        assert_eq!(Volume::default().get(), 0.5);
        assert_eq!(Volume::default().percent(), 50);
    }

    #[test]
    fn test_new_accepts_bounds() {
        assert_eq!(Volume::new(0.0).unwrap(), Volume::MIN);
        assert_eq!(Volume::new(1.0).unwrap(), Volume::MAX);
        assert_eq!(Volume::new(0.25).unwrap().get(), 0.25);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(Volume::new(1.01), Err(SoundError::InvalidVolume(_))));
        assert!(matches!(Volume::new(-0.1), Err(SoundError::InvalidVolume(_))));
        assert!(matches!(Volume::new(f32::NAN), Err(SoundError::InvalidVolume(_))));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Volume::clamped(3.0), Volume::MAX);
        assert_eq!(Volume::clamped(-3.0), Volume::MIN);
        assert_eq!(Volume::clamped(f32::NAN), Volume::MIN);
        assert_eq!(Volume::clamped(0.7).get(), 0.7);
    }

    #[test]
    fn test_display() {
        assert_eq!(Volume::clamped(0.42).to_string(), "42%");
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Volume>("2.0").is_err());
        let volume: Volume = serde_json::from_str("0.75").unwrap();
        assert_eq!(volume.get(), 0.75);
    }
}
