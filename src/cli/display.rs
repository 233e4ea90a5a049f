//! Display utilities for the Repeat Timer CLI.
//!
//! This module provides formatted output for:
//! - Countdown progress and cycle boundaries
//! - The run summary
//! - Catalog listings (presets, sounds)
//! - Theme and error messages
//!
//! Line builders return `String`s so they can be tested; the `show_*`
//! functions print them.

use std::path::PathBuf;

use crate::duration::{self, Preset};
use crate::preferences::Theme;
use crate::sound::{AlertCue, SoundEntry, Volume, COMPLETION_SOUND_ID};
use crate::types::{ControllerSnapshot, RunSummary};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the start of a run.
    pub fn show_started(duration_seconds: u64, total_cycles: u32, sound: &str, volume: Option<Volume>) {
        for line in Self::started_lines(duration_seconds, total_cycles, sound, volume) {
            println!("{}", line);
        }
    }

    /// Shows the remaining time.
    pub fn show_remaining(snapshot: &ControllerSnapshot) {
        println!("{}", Self::remaining_line(snapshot));
    }

    /// Shows the end of a cycle.
    pub fn show_cycle_completed(cycle_index: u32, total_cycles: u32) {
        println!("{}", Self::cycle_completed_line(cycle_index, total_cycles));
    }

    /// Shows the summary of a completed run.
    pub fn show_summary(summary: &RunSummary) {
        println!("* タイマーが完了しました");
        for line in Self::summary_lines(summary) {
            println!("{}", line);
        }
    }

    /// Shows that the timer was stopped.
    pub fn show_stopped() {
        println!("[] タイマーを停止しました");
    }

    /// Shows a failed alert. The run continues.
    pub fn show_alert_failed(cue: AlertCue, message: &str) {
        let cue_display = match cue {
            AlertCue::Cycle => "アラーム音",
            AlertCue::Completion => "完了音",
            AlertCue::Preview => "試聴",
        };
        eprintln!("警告: {}を再生できませんでした: {}", cue_display, message);
    }

    /// Shows the preset durations.
    pub fn show_presets(presets: &[Preset]) {
        println!("プリセット");
        println!("─────────────────────────────");
        for preset in presets {
            println!("{}", Self::preset_line(preset));
        }
    }

    /// Shows the sound catalog.
    pub fn show_sounds(sounds: &[(&SoundEntry, PathBuf, bool)]) {
        println!("アラーム音");
        println!("─────────────────────────────");
        for (entry, path, exists) in sounds {
            println!("{}", Self::sound_line(entry, *exists));
            if !exists {
                println!("    (ファイルなし: {} / 内蔵音を使用)", path.display());
            }
        }
    }

    /// Shows the theme, after a change if `changed`.
    pub fn show_theme(theme: Theme, changed: bool) {
        println!("{}", Self::theme_line(theme, changed));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Shows a hint for resolving an error.
    pub fn show_suggestion(suggestion: &str) {
        eprintln!("  ヒント: {}", suggestion);
    }

    // ------------------------------------------------------------------------
    // Line builders
    // ------------------------------------------------------------------------

    fn started_lines(
        duration_seconds: u64,
        total_cycles: u32,
        sound: &str,
        volume: Option<Volume>,
    ) -> Vec<String> {
        let mut lines = vec!["> タイマーを開始しました".to_string()];
        lines.push(format!("  時間: {}", duration::format_u64(duration_seconds)));
        if total_cycles > 1 {
            lines.push(format!("  繰り返し: {}回", total_cycles));
            lines.push(format!(
                "  合計: {}",
                duration::format_u64(duration_seconds.saturating_mul(u64::from(total_cycles)))
            ));
        }
        match volume {
            Some(volume) => lines.push(format!("  サウンド: {} ({})", sound, volume)),
            None => lines.push("  サウンド: オフ".to_string()),
        }
        lines
    }

    fn remaining_line(snapshot: &ControllerSnapshot) -> String {
        let remaining = duration::format_u64(snapshot.remaining_seconds);
        match snapshot.cycle_label() {
            Some(label) => format!("  {}  ({})", remaining, label),
            None => format!("  {}", remaining),
        }
    }

    fn cycle_completed_line(cycle_index: u32, total_cycles: u32) -> String {
        if total_cycles > 1 {
            format!("! アラーム ({}/{})", cycle_index + 1, total_cycles)
        } else {
            "! アラーム".to_string()
        }
    }

    fn summary_lines(summary: &RunSummary) -> Vec<String> {
        let mut lines = vec![format!(
            "  開始: {}",
            duration::format_clock(&summary.started_at)
        )];

        for alarm in &summary.alarms {
            let line = match alarm.actual {
                Some(actual) => format!(
                    "  第{} アラーム: {} (予定 {})",
                    alarm.cycle + 1,
                    duration::format_clock(&actual),
                    duration::format_clock(&alarm.predicted)
                ),
                None => format!(
                    "  第{} アラーム: 予定 {}",
                    alarm.cycle + 1,
                    duration::format_clock(&alarm.predicted)
                ),
            };
            lines.push(line);
        }

        let end = summary.finished_at.unwrap_or(summary.predicted_end);
        lines.push(format!("  終了: {}", duration::format_clock(&end)));
        let elapsed = (end - summary.started_at).num_seconds();
        lines.push(format!("  合計: {}", duration::format(elapsed)));
        lines
    }

    fn preset_line(preset: &Preset) -> String {
        format!("  {:<8} {}", preset.label, duration::format_u64(preset.seconds))
    }

    fn sound_line(entry: &SoundEntry, exists: bool) -> String {
        let marker = if exists { "*" } else { "-" };
        let note = if entry.id == COMPLETION_SOUND_ID {
            " [完了音]"
        } else {
            ""
        };
        format!("  {} {:<14} {}{}", marker, entry.id, entry.label, note)
    }

    fn theme_line(theme: Theme, changed: bool) -> String {
        let theme_display = match theme {
            Theme::Dark => "ダーク",
            Theme::Light => "ライト",
        };
        if changed {
            format!("* テーマを{}に変更しました", theme_display)
        } else {
            format!("テーマ: {} ({})", theme_display, theme.as_str())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
