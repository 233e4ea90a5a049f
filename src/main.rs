//! Repeat Timer CLI - a repeating countdown timer
//!
//! Counts down a duration, plays an alert every time it reaches zero and
//! optionally repeats the countdown a fixed number of times.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use repeat_timer::cli::{Cli, Commands, Display, RunArgs, ThemeArg};
use repeat_timer::duration::{DurationError, PRESETS};
use repeat_timer::preferences::{FilePreferenceStore, PreferenceError, PreferenceStore, Theme};
use repeat_timer::sound::{
    default_sounds_dir, try_create_player, AlertDispatcher, SoundCatalog, SoundError, SoundPlayer,
};
use repeat_timer::{TimerConfig, TimerController, TimerError, TimerEvent};

/// How long to keep the process alive after the final cue so it is heard.
const COMPLETION_GRACE: Duration = Duration::from_millis(1500);

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(suggestion) = suggestion_for(&e) {
            Display::show_suggestion(suggestion);
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            run_timer(args).await?;
        }
        Some(Commands::Presets) => {
            Display::show_presets(PRESETS);
        }
        Some(Commands::Sounds { sounds_dir }) => {
            let catalog = SoundCatalog::new(sounds_dir.unwrap_or_else(default_sounds_dir));
            Display::show_sounds(&catalog.list());
        }
        Some(Commands::Theme { mode }) => {
            change_theme(mode, cli.preferences)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs a countdown in the foreground until it completes or Ctrl-C.
async fn run_timer(args: RunArgs) -> Result<()> {
    let catalog = SoundCatalog::new(args.sounds_dir.clone().unwrap_or_else(default_sounds_dir));
    let player: Option<Arc<dyn SoundPlayer>> = if args.no_sound {
        None
    } else {
        try_create_player(false).map(|p| p as Arc<dyn SoundPlayer>)
    };
    let audible = player.is_some();

    let config = run_config(&args);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let controller = TimerController::new(config, AlertDispatcher::new(player, catalog), event_tx);
    controller
        .set_selected_sound(&args.sound)
        .await
        .with_context(|| format!("サウンド '{}' を選択できませんでした", args.sound))?;
    controller.set_volume(args.volume.get()).await?;
    controller.restart().await.context("タイマーを開始できませんでした")?;

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                match event {
                    TimerEvent::Started { duration_seconds, total_cycles, .. } => {
                        let volume = audible.then_some(args.volume);
                        Display::show_started(duration_seconds, total_cycles, &args.sound, volume);
                        Display::show_remaining(&controller.snapshot().await);
                    }
                    TimerEvent::Tick { .. } => {
                        Display::show_remaining(&controller.snapshot().await);
                    }
                    TimerEvent::CycleCompleted { cycle_index, total_cycles } => {
                        Display::show_cycle_completed(cycle_index, total_cycles);
                    }
                    TimerEvent::AlertFailed { cue, message } => {
                        Display::show_alert_failed(cue, &message);
                    }
                    TimerEvent::Completed { summary } => {
                        Display::show_summary(&summary);
                        if audible {
                            sleep(COMPLETION_GRACE).await;
                        }
                        break;
                    }
                    TimerEvent::Paused { .. } | TimerEvent::Resumed { .. } => {}
                    TimerEvent::Stopped => break,
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Ctrl-C の待機に失敗しました")?;
                controller.stop().await;
                Display::show_stopped();
                break;
            }
        }
    }

    Ok(())
}

/// Builds the timer configuration; out-of-range repeat counts are clamped.
fn run_config(args: &RunArgs) -> TimerConfig {
    let config = TimerConfig::new(args.duration);
    match args.repeat {
        Some(count) => config.with_repeat(count),
        None => config,
    }
}

/// Shows or changes the persisted theme.
fn change_theme(mode: Option<ThemeArg>, path: Option<PathBuf>) -> Result<()> {
    let store = match path {
        Some(path) => FilePreferenceStore::new(path),
        None => FilePreferenceStore::default_location()?,
    };

    let theme = match mode {
        None => store.theme(),
        Some(ThemeArg::Dark) => store.set_theme(Theme::Dark).map(|()| Theme::Dark),
        Some(ThemeArg::Light) => store.set_theme(Theme::Light).map(|()| Theme::Light),
        Some(ThemeArg::Toggle) => store.toggle_theme(),
    }
    .with_context(|| format!("設定ファイル {} を処理できませんでした", store.path().display()))?;

    Display::show_theme(theme, mode.is_some());
    Ok(())
}

/// Finds a hint for the first known error in the chain.
fn suggestion_for(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<TimerError>() {
            Some(e.suggestion())
        } else if let Some(e) = cause.downcast_ref::<SoundError>() {
            Some(e.suggestion())
        } else if let Some(e) = cause.downcast_ref::<PreferenceError>() {
            Some(e.suggestion())
        } else {
            cause.downcast_ref::<DurationError>().map(DurationError::suggestion)
        }
    })
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
