//! pomoclock - a Pomodoro session timer
//!
//! Alternates focused work and short breaks, with a long break after a
//! configurable number of completed work cycles:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break every 10 cycles

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tracing::warn;

use pomoclock::cli::{Cli, Commands, DaemonArgs, Display, IpcClient, ThemeChoice};
use pomoclock::daemon::{self, DaemonOptions};
use pomoclock::paths::AppPaths;
use pomoclock::preferences::{JsonPreferenceStore, Theme};
use pomoclock::types::SessionConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
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
    let socket = cli.socket;

    match cli.command {
        Some(Commands::Toggle) => {
            let response = IpcClient::from_option(socket)?.toggle().await?;
            Display::show_toggle_success(&response);
        }
        Some(Commands::Reset) => {
            let response = IpcClient::from_option(socket)?.reset().await?;
            Display::show_reset_success(&response);
        }
        Some(Commands::Status) => {
            let response = IpcClient::from_option(socket)?.status().await?;
            Display::show_status(&response, current_theme());
        }
        Some(Commands::Apply(args)) => {
            if args.is_empty() {
                bail!("Nothing to apply: pass --work, --break-time, --long-break or --cycles");
            }
            let response = IpcClient::from_option(socket)?.apply(&args).await?;
            Display::show_apply_success(&response);
        }
        Some(Commands::Watch) => {
            let client = IpcClient::from_option(socket)?;
            pomoclock::cli::watch::run(client, current_theme()).await?;
        }
        Some(Commands::Theme { choice }) => {
            let theme = change_theme(choice)?;
            Display::show_theme(theme);
        }
        Some(Commands::Daemon(args)) => {
            let options = daemon_options(args, socket)?;
            daemon::run(options).await?;
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

/// Loads the stored theme, falling back to light on any error.
fn current_theme() -> Theme {
    let store = AppPaths::resolve().and_then(|paths| {
        JsonPreferenceStore::open(paths.preferences()).context("Failed to load preferences")
    });

    match store {
        Ok(store) => Theme::load(&store),
        Err(e) => {
            warn!("{:#}", e);
            Theme::default()
        }
    }
}

/// Applies a theme choice and returns the resulting theme.
fn change_theme(choice: Option<ThemeChoice>) -> Result<Theme> {
    let paths = AppPaths::resolve()?;
    let mut store = JsonPreferenceStore::open(paths.preferences())?;
    let current = Theme::load(&store);

    let next = match choice {
        None => return Ok(current),
        Some(ThemeChoice::Light) => Theme::Light,
        Some(ThemeChoice::Dark) => Theme::Dark,
        Some(ThemeChoice::Toggle) => current.toggled(),
    };

    next.save(&mut store)?;
    Ok(next)
}

fn daemon_options(args: DaemonArgs, socket: Option<std::path::PathBuf>) -> Result<DaemonOptions> {
    let paths = AppPaths::resolve()?;

    Ok(DaemonOptions {
        socket_path: socket.unwrap_or_else(|| paths.socket()),
        config: args.durations.overlay(&SessionConfig::default()),
        sounds_dir: Some(args.sounds_dir.unwrap_or_else(|| paths.sounds_dir())),
        sound_enabled: !args.no_sound,
        notifications_enabled: !args.no_notify,
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
