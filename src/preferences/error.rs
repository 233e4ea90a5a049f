//! Preference store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// No configuration directory could be determined.
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    /// The preference file could not be read or written.
    #[error("設定ファイルの読み書きに失敗しました: {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The preference file is not valid JSON.
    #[error("設定ファイルの形式が不正です: {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Preferences could not be serialized.
    #[error("設定のシリアライズに失敗しました: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PreferenceError {
    /// Returns true if the stored file exists but is unreadable as JSON.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ConfigDirNotFound => "HOME 環境変数が設定されているか確認してください",
            Self::Io { .. } => "ファイルのアクセス権を確認してください",
            Self::Parse { .. } => "設定ファイルを削除すると既定値に戻ります",
            Self::Serialize(_) => "アプリケーションを再起動してください",
        }
    }
}
