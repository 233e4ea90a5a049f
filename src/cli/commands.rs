//! Command definitions for the Repeat Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::duration;
use crate::sound::{find_sound, Volume, DEFAULT_SOUND_ID};

// ============================================================================
// CLI Structure
// ============================================================================

/// Repeat Timer CLI - a repeating countdown with audible alerts
#[derive(Parser, Debug)]
#[command(
    name = "repeat-timer",
    version,
    about = "繰り返し実行できるカウントダウンタイマー",
    long_about = "指定した時間をカウントダウンし、0になるたびにアラーム音を鳴らします。\n\
                  繰り返し回数を指定すると、同じ時間のカウントダウンを連続して実行します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preference file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub preferences: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a countdown in the foreground
    Run(RunArgs),

    /// List the preset durations
    Presets,

    /// List the alert sounds
    Sounds {
        /// Directory holding the sound files
        #[arg(long, value_name = "DIR")]
        sounds_dir: Option<PathBuf>,
    },

    /// Show or change the display theme
    Theme {
        /// New theme; shows the current one when omitted
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Theme argument of the `theme` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    /// Dark theme
    Dark,
    /// Light theme
    Light,
    /// Switch to the other theme
    Toggle,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Duration per cycle (HH:MM:SS, MM:SS, SS) or a preset label such as "5 min"
    #[arg(value_parser = parse_duration_arg)]
    pub duration: u64,

    /// Repeat the countdown this many times (clamped to 1-100)
    #[arg(short, long, allow_negative_numbers = true)]
    pub repeat: Option<i64>,

    /// Alert sound played at the end of every cycle
    #[arg(short, long, default_value = DEFAULT_SOUND_ID, value_parser = validate_sound)]
    pub sound: String,

    /// Alert volume (0.0-1.0)
    #[arg(long, default_value = "0.5", value_parser = parse_volume)]
    pub volume: Volume,

    /// Directory holding the sound files
    #[arg(long, value_name = "DIR")]
    pub sounds_dir: Option<PathBuf>,

    /// Disable alert sounds
    #[arg(long)]
    pub no_sound: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a duration or preset label.
///
/// - Must be a valid duration string or preset label
/// - Must be at least one second
fn parse_duration_arg(s: &str) -> Result<u64, String> {
    let seconds = duration::resolve(s).map_err(|e| format!("{} ({})", e, e.suggestion()))?;
    if seconds == 0 {
        return Err("時間は1秒以上にしてください".to_string());
    }
    Ok(seconds)
}

/// Validates the sound identifier against the catalog.
fn validate_sound(s: &str) -> Result<String, String> {
    find_sound(s)
        .map(|entry| entry.id.to_string())
        .ok_or_else(|| format!("不明なサウンドです: '{}' (sounds コマンドで一覧を確認できます)", s))
}

/// Parses a volume in `[0.0, 1.0]`.
fn parse_volume(s: &str) -> Result<Volume, String> {
    let value: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("音量は数値で指定してください: '{}'", s))?;
    Volume::new(value).map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["repeat-timer"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.preferences.is_none());
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["repeat-timer", "--verbose"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["repeat-timer", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_presets_command() {
            let cli = Cli::parse_from(["repeat-timer", "presets"]);
            assert!(matches!(cli.command, Some(Commands::Presets)));
        }

        #[test]
        fn test_parse_sounds_command() {
            let cli = Cli::parse_from(["repeat-timer", "sounds", "--sounds-dir", "/tmp/s"]);
            match cli.command {
                Some(Commands::Sounds { sounds_dir }) => {
                    assert_eq!(sounds_dir, Some(PathBuf::from("/tmp/s")));
                }
                _ => panic!("Expected Sounds command"),
            }
        }

        #[test]
        fn test_parse_theme_show() {
            let cli = Cli::parse_from(["repeat-timer", "theme"]);
            assert!(matches!(cli.command, Some(Commands::Theme { mode: None })));
        }

        #[test]
        fn test_parse_theme_toggle_with_preferences() {
            let cli = Cli::parse_from(["repeat-timer", "theme", "toggle", "--preferences", "p.json"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Theme {
                    mode: Some(ThemeArg::Toggle)
                })
            ));
            assert_eq!(cli.preferences, Some(PathBuf::from("p.json")));
        }

        #[test]
        fn test_parse_theme_invalid() {
            assert!(Cli::try_parse_from(["repeat-timer", "theme", "blue"]).is_err());
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["repeat-timer", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Run Command Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        fn parse_run(args: &[&str]) -> RunArgs {
            let mut argv = vec!["repeat-timer", "run"];
            argv.extend_from_slice(args);
            match Cli::parse_from(argv).command {
                Some(Commands::Run(args)) => args,
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_defaults() {
            let args = parse_run(&["01:30"]);
            assert_eq!(args.duration, 90);
            assert!(args.repeat.is_none());
            assert_eq!(args.sound, DEFAULT_SOUND_ID);
            assert_eq!(args.volume, Volume::default());
            assert!(args.sounds_dir.is_none());
            assert!(!args.no_sound);
        }

        #[test]
        fn test_parse_run_preset() {
            assert_eq!(parse_run(&["7.5 min"]).duration, 450);
            assert_eq!(parse_run(&["3sec"]).duration, 3);
        }

        #[test]
        fn test_parse_run_all_options() {
            let args = parse_run(&[
                "10",
                "--repeat",
                "4",
                "--sound",
                "Church Bell",
                "--volume",
                "0.8",
                "--no-sound",
            ]);
            assert_eq!(args.duration, 10);
            assert_eq!(args.repeat, Some(4));
            assert_eq!(args.sound, "church-bell");
            assert_eq!(args.volume.get(), 0.8);
            assert!(args.no_sound);
        }

        #[test]
        fn test_parse_run_short_options() {
            let args = parse_run(&["1:00", "-r", "2", "-s", "magic-ring"]);
            assert_eq!(args.repeat, Some(2));
            assert_eq!(args.sound, "magic-ring");
        }

        #[test]
        fn test_parse_run_rejects_zero_duration() {
            assert!(Cli::try_parse_from(["repeat-timer", "run", "00:00"]).is_err());
            assert!(Cli::try_parse_from(["repeat-timer", "run", ""]).is_err());
        }

        #[test]
        fn test_parse_run_rejects_bad_duration() {
            assert!(Cli::try_parse_from(["repeat-timer", "run", "aa:bb"]).is_err());
        }

        #[test]
        fn test_parse_run_repeat_out_of_range_is_accepted() {
            assert_eq!(parse_run(&["5", "--repeat", "0"]).repeat, Some(0));
            assert_eq!(parse_run(&["5", "--repeat", "150"]).repeat, Some(150));
            assert_eq!(parse_run(&["5", "--repeat=-3"]).repeat, Some(-3));
        }

        #[test]
        fn test_parse_run_repeat_not_a_number() {
            assert!(Cli::try_parse_from(["repeat-timer", "run", "5", "--repeat", "many"]).is_err());
        }

        #[test]
        fn test_parse_run_unknown_sound() {
            assert!(Cli::try_parse_from(["repeat-timer", "run", "5", "--sound", "kazoo"]).is_err());
        }

        #[test]
        fn test_parse_run_volume_range() {
            assert!(Cli::try_parse_from(["repeat-timer", "run", "5", "--volume", "1.5"]).is_err());
            assert!(Cli::try_parse_from(["repeat-timer", "run", "5", "--volume", "loud"]).is_err());
            assert!(Cli::try_parse_from(["repeat-timer", "run", "5", "--volume", "0"]).is_ok());
        }

        #[test]
        fn test_parse_run_requires_duration() {
            assert!(Cli::try_parse_from(["repeat-timer", "run"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Validation Tests
    // ------------------------------------------------------------------------

    mod validation_tests {
        use super::*;

        #[test]
        fn test_parse_duration_arg() {
            assert_eq!(parse_duration_arg("1:00:00"), Ok(3600));
            assert!(parse_duration_arg("0").unwrap_err().contains("1秒以上"));
            assert!(parse_duration_arg("x:1").unwrap_err().contains("HH:MM:SS"));
        }

        #[test]
        fn test_validate_sound_normalizes_to_id() {
            assert_eq!(validate_sound("GAMING-LOCK"), Ok("gaming-lock".to_string()));
            assert!(validate_sound("").is_err());
        }

        #[test]
        fn test_parse_volume() {
            assert_eq!(parse_volume(" 0.25 ").unwrap().get(), 0.25);
            assert!(parse_volume("NaN").is_err());
            assert!(parse_volume("-0.1").is_err());
        }
    }
}
