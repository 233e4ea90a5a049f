//! End-to-End Tests for the Repeat Timer CLI.
//!
//! These tests run the compiled binary:
//! - Listing presets and sounds
//! - Showing and changing the theme
//! - Running a short countdown to completion
//! - Rejecting invalid input

use assert_cmd::Command;
use predicates::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn repeat_timer() -> Command {
    let mut cmd = Command::cargo_bin("repeat-timer").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

// ============================================================================
// Listing Tests
// ============================================================================

mod listing_e2e {
    use super::*;

    #[test]
    fn test_presets() {
        repeat_timer()
            .arg("presets")
            .assert()
            .success()
            .stdout(predicate::str::contains("3 sec"))
            .stdout(predicate::str::contains("00:07:30"))
            .stdout(predicate::str::contains("01:30:00"));
    }

    #[test]
    fn test_sounds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("church-bell.mp3"), b"").unwrap();

        repeat_timer()
            .args(["sounds", "--sounds-dir"])
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("* church-bell"))
            .stdout(predicate::str::contains("- wood-knock"))
            .stdout(predicate::str::contains("[完了音]"));
    }

    #[test]
    fn test_help_without_command() {
        repeat_timer()
            .assert()
            .success()
            .stdout(predicate::str::contains("run"));
    }

    #[test]
    fn test_completions() {
        repeat_timer()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("repeat-timer"));
    }
}

// ============================================================================
// Theme Tests
// ============================================================================

mod theme_e2e {
    use super::*;

    #[test]
    fn test_theme_default_and_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("preferences.json");

        repeat_timer()
            .arg("theme")
            .arg("--preferences")
            .arg(&prefs)
            .assert()
            .success()
            .stdout(predicate::str::contains("(dark)"));

        repeat_timer()
            .args(["theme", "toggle", "--preferences"])
            .arg(&prefs)
            .assert()
            .success()
            .stdout(predicate::str::contains("ライト"));

        repeat_timer()
            .args(["theme", "--preferences"])
            .arg(&prefs)
            .assert()
            .success()
            .stdout(predicate::str::contains("(light)"));
    }

    #[test]
    fn test_theme_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("preferences.json");
        std::fs::write(&prefs, "{ not json").unwrap();

        repeat_timer()
            .args(["theme", "--preferences"])
            .arg(&prefs)
            .assert()
            .failure()
            .stderr(predicate::str::contains("エラー"));
    }
}

// ============================================================================
// Run Tests
// ============================================================================

mod run_e2e {
    use super::*;

    #[test]
    fn test_run_one_second_without_sound() {
        repeat_timer()
            .args(["run", "1", "--no-sound"])
            .timeout(std::time::Duration::from_secs(10))
            .assert()
            .success()
            .stdout(predicate::str::contains("タイマーを開始しました"))
            .stdout(predicate::str::contains("サウンド: オフ"))
            .stdout(predicate::str::contains("第1 アラーム"))
            .stdout(predicate::str::contains("タイマーが完了しました"));
    }

    #[test]
    fn test_run_repeating_without_sound() {
        repeat_timer()
            .args(["run", "1", "--repeat", "2", "--no-sound"])
            .timeout(std::time::Duration::from_secs(10))
            .assert()
            .success()
            .stdout(predicate::str::contains("繰り返し: 2回"))
            .stdout(predicate::str::contains("アラーム (2/2)"))
            .stdout(predicate::str::contains("第2 アラーム"));
    }

    #[test]
    fn test_run_clamps_large_repeat_count() {
        // A 100-cycle run does not finish within the timeout; the banner is
        // printed before the first tick.
        repeat_timer()
            .args(["run", "1", "--repeat", "150", "--no-sound"])
            .timeout(std::time::Duration::from_secs(2))
            .assert()
            .stdout(predicate::str::contains("繰り返し: 100回"))
            .stdout(predicate::str::contains("(1/100)"));
    }

    #[test]
    fn test_run_clamps_zero_repeat_count() {
        repeat_timer()
            .args(["run", "1", "--repeat", "0", "--no-sound"])
            .timeout(std::time::Duration::from_secs(10))
            .assert()
            .success()
            .stdout(predicate::str::contains("繰り返し").not())
            .stdout(predicate::str::contains("タイマーが完了しました"));
    }

    #[test]
    fn test_run_rejects_invalid_duration() {
        repeat_timer()
            .args(["run", "ab:cd"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("ab"));
    }

    #[test]
    fn test_run_rejects_zero_duration() {
        repeat_timer()
            .args(["run", "0:00"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("1秒以上"));
    }

    #[test]
    fn test_run_rejects_out_of_range_volume() {
        repeat_timer()
            .args(["run", "5", "--volume", "2"])
            .assert()
            .failure();
    }
}
