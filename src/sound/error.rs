//! Sound system error types.
//!
//! Alert playback is never fatal to the countdown: every error here is
//! reported and the run carries on.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),

    /// The sound identifier is not in the catalog.
    #[error("不明なサウンドです: {0}")]
    UnknownSound(String),

    /// Volume outside `[0.0, 1.0]`.
    #[error("音量は0.0から1.0の範囲で指定してください: {0}")]
    InvalidVolume(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if this error was caused by caller input rather than playback.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownSound(_) | Self::InvalidVolume(_))
    }

    /// Returns true if playback should fall back to the built-in tone.
    #[must_use]
    pub fn should_fallback_to_tone(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続してください",
            Self::FileNotFound(_) => "内蔵トーンで再生を試みます",
            Self::DecodeError(_) => "サウンドファイルが破損している可能性があります",
            Self::StreamError(_) => "オーディオ設定を確認してください",
            Self::PlaybackError(_) => "アプリケーションを再起動してください",
            Self::UnknownSound(_) => "`repeat-timer sounds` で利用可能なサウンドを確認してください",
            Self::InvalidVolume(_) => "0.0から1.0の値を指定してください",
        }
    }
}
