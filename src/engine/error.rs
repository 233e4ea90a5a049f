//! Timer engine error types.

use thiserror::Error;

/// Errors returned by timer transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// A run needs a per-cycle duration of at least one second.
    #[error("タイマーの時間が設定されていません")]
    ZeroDuration,

    /// The transition needs a running timer.
    #[error("タイマーは実行されていません")]
    NotRunning,

    /// The transition needs a paused timer.
    #[error("タイマーは一時停止していません")]
    NotPaused,
}

impl TimerError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ZeroDuration => "1秒以上の時間を HH:MM:SS 形式で指定してください",
            Self::NotRunning => "先にタイマーを開始してください",
            Self::NotPaused => "一時停止中のタイマーのみ再開できます",
        }
    }
}
