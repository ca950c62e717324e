//! `callscope` command line player
//!
//! Plays, inspects and searches recorded sales call timelines in the
//! terminal.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use callscope_core::{Config, ItemId, Result, utils::parse_duration};
use callscope_player::{
    PlaybackDriver, StopReason, TextRenderer, ViewOptions,
    commands::{self, apply_view},
    provider_for,
    render::status_line,
};
use callscope_timeline::{Key, Message};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info, warn};

/// Command line interface for the callscope player
#[derive(Parser)]
#[command(
    name = "callscope",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal player for sales call transcript timelines",
    long_about = "Plays recorded sales calls against a zoomable timeline of speaker turns, silences and event markers."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Directory of call records (overrides config)
    #[arg(long, value_name = "DIRECTORY", env = "CALLSCOPE__DATA__CALLS_DIR")]
    calls_dir: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Play a call in real time
    Play {
        /// Call id (defaults to the configured call)
        #[arg(value_name = "CALL")]
        call: Option<String>,

        /// Playback speed, one of `playback.speed_options`
        #[arg(short, long)]
        speed: Option<f64>,

        /// Zoom-in steps before playing
        #[arg(short, long, default_value = "0")]
        zoom: u32,

        /// Start position (SS, MM:SS or HH:MM:SS)
        #[arg(long, value_parser = parse_time)]
        from: Option<f64>,

        /// Pause at this position
        #[arg(long, value_parser = parse_time)]
        until: Option<f64>,

        /// Timeline width in characters
        #[arg(long, default_value = "80")]
        columns: usize,

        /// Only print the final frame
        #[arg(short, long)]
        quiet: bool,
    },

    /// Render a single frame
    Inspect {
        /// Call id (defaults to the configured call)
        #[arg(value_name = "CALL")]
        call: Option<String>,

        /// Playhead position (SS, MM:SS or HH:MM:SS)
        #[arg(long, value_parser = parse_time)]
        at: Option<f64>,

        /// Zoom-in steps
        #[arg(short, long, default_value = "0")]
        zoom: u32,

        /// Shortcut to press, repeatable (space, left, right, f)
        #[arg(short, long = "key", value_name = "KEY")]
        keys: Vec<Key>,

        /// Segment id whose hover label is drawn under the lanes
        #[arg(long, value_name = "SEGMENT")]
        hover: Option<ItemId>,

        /// Timeline width in characters
        #[arg(long, default_value = "80")]
        columns: usize,

        /// Print the frame as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search transcript text
    Search {
        /// Text to look for (case-insensitive)
        #[arg(value_name = "QUERY")]
        query: String,

        /// Call id (defaults to the configured call)
        #[arg(long)]
        call: Option<String>,
    },

    /// List available calls
    Calls {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configuration file
        #[arg(short, long)]
        validate: bool,
    },
}

fn parse_time(value: &str) -> std::result::Result<f64, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    if let Some(dir) = cli.calls_dir {
        config.data.calls_dir = Some(dir);
    }

    let _log_guard = callscope_core::init_logging(&config.logging)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = config.logging.level,
        "callscope starting"
    );

    match cli.command {
        Some(Commands::Play {
            call,
            speed,
            zoom,
            from,
            until,
            columns,
            quiet,
        }) => {
            let options = PlayOptions {
                speed,
                view: ViewOptions {
                    zoom_steps: zoom,
                    at: from,
                    keys: Vec::new(),
                },
                until,
                renderer: TextRenderer::new(columns),
                quiet,
            };
            play(&config, call.as_deref(), options).await
        }
        Some(Commands::Inspect {
            call,
            at,
            zoom,
            keys,
            hover,
            columns,
            json,
        }) => {
            let provider = provider_for(&config.data);
            let mut session =
                commands::open_session(provider.as_ref(), call.as_deref(), &config).await?;
            apply_view(
                &mut session,
                &ViewOptions {
                    zoom_steps: zoom,
                    at,
                    keys,
                },
            );
            print!(
                "{}",
                commands::inspect(&session, &TextRenderer::new(columns), hover, json)?
            );
            Ok(())
        }
        Some(Commands::Search { query, call }) => {
            let provider = provider_for(&config.data);
            let mut session =
                commands::open_session(provider.as_ref(), call.as_deref(), &config).await?;
            print!("{}", commands::search(&mut session, &query));
            Ok(())
        }
        Some(Commands::Calls { json }) => {
            let provider = provider_for(&config.data);
            print!("{}", commands::list_calls(provider.as_ref(), json).await?);
            Ok(())
        }
        Some(Commands::Config { show, validate }) => handle_config_command(&config, show, validate),
        None => {
            // Default: play the configured call
            let options = PlayOptions {
                speed: None,
                view: ViewOptions::default(),
                until: None,
                renderer: TextRenderer::default(),
                quiet: false,
            };
            play(&config, None, options).await
        }
    }
}

/// Load configuration from file or environment
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => {
            // Logging is not initialized yet
            eprintln!("Loading configuration from: {}", path.display());
            Config::from_file(path)
        }
        None => Config::load(),
    }
}

struct PlayOptions {
    speed: Option<f64>,
    view: ViewOptions,
    until: Option<f64>,
    renderer: TextRenderer,
    quiet: bool,
}

async fn play(config: &Config, call: Option<&str>, options: PlayOptions) -> Result<()> {
    let provider = provider_for(&config.data);
    let mut session = commands::open_session(provider.as_ref(), call, config).await?;
    apply_view(&mut session, &options.view);

    if let Some(speed) = options.speed {
        commands::check_speed(&config.playback, speed)?;
        session.update(Message::SetSpeed(speed));
    }

    let tick = config.playback.tick_interval();
    let ticks_per_second = u64::try_from(1000 / tick.as_millis().max(1)).unwrap_or(1);
    let mut driver = PlaybackDriver::new(tick).with_report_every(ticks_per_second);
    if let Some(until) = options.until {
        driver = driver.with_stop_at(until);
    }

    session.update(Message::Play);
    let quiet = options.quiet;
    let summary = tokio::select! {
        summary = driver.run(&mut session, |session| {
            if !quiet {
                println!("{}", status_line(session));
            }
        }) => Some(summary),
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, stopping playback");
            None
        }
    };

    print!("{}", options.renderer.render(&session));
    if let Some(summary) = summary {
        match summary.reason {
            StopReason::Finished => info!(ticks = summary.ticks, "playback finished"),
            StopReason::StopTime => info!(position = summary.position, "stopped at requested time"),
            StopReason::Paused => info!(position = summary.position, "playback paused"),
        }
    }
    Ok(())
}

/// Handle the config subcommand
fn handle_config_command(config: &Config, show: bool, validate: bool) -> Result<()> {
    if validate {
        config.validate()?;
        println!("Configuration is valid");
    }

    if show || !validate {
        print!("{}", config.to_toml()?);
    }

    Ok(())
}
