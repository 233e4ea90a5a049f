//! Duration parsing error types.

use thiserror::Error;

/// Errors that can occur while parsing a duration string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// A colon-separated segment is not a non-negative integer.
    #[error("時間の値が不正です: '{0}'")]
    InvalidSegment(String),

    /// The total number of seconds does not fit into `u64`.
    #[error("時間が大きすぎます: {0}")]
    Overflow(String),
}

impl DurationError {
    /// Returns true if the input contained a non-numeric segment.
    #[must_use]
    pub fn is_invalid_segment(&self) -> bool {
        matches!(self, Self::InvalidSegment(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidSegment(_) => "HH:MM:SS、MM:SS、SS のいずれかの形式で入力してください",
            Self::Overflow(_) => "より短い時間を指定してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DurationError::InvalidSegment("ab".to_string());
        assert!(err.to_string().contains("'ab'"));

        let err = DurationError::Overflow("99999999999999999999:00".to_string());
        assert!(err.to_string().contains("99999999999999999999:00"));
    }

    #[test]
    fn test_is_invalid_segment() {
        assert!(DurationError::InvalidSegment("x".into()).is_invalid_segment());
        assert!(!DurationError::Overflow("x".into()).is_invalid_segment());
    }

    #[test]
    fn test_suggestion() {
        assert!(DurationError::InvalidSegment("x".into())
            .suggestion()
            .contains("HH:MM:SS"));
        assert!(!DurationError::Overflow("x".into()).suggestion().is_empty());
    }
}
