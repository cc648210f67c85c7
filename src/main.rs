use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use bonus_snake::audio::Beeper;
use bonus_snake::config::{ConfigError, ConfigOverrides, GameConfig};
use bonus_snake::game::GameState;
use bonus_snake::input::{GameInput, InputHandler};
use bonus_snake::renderer;
use bonus_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    cols: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    rows: Option<u16>,

    /// Milliseconds between grid steps.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the beep on food consumption.
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let (config, state) = match start_session(&cli) {
        Ok(started) => started,
        Err(error) => {
            eprintln!("{error}");
            process::exit(2);
        }
    };

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    info!(
        width = state.bounds().width,
        height = state.bounds().height,
        tick_ms = config.tick_interval_ms,
        "starting session"
    );

    install_panic_hook();
    run(state, Beeper::new(!cli.mute))
}

fn run(mut state: GameState, beeper: Beeper) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let mut last_frame = Instant::now();

    loop {
        let board = state.board();
        let display = state.display();
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &board, &display))?;

        if let Some(game_input) = input.poll_input(FRAME_INTERVAL)? {
            if matches!(game_input, GameInput::Quit) {
                break;
            }

            state.apply_input(game_input);
        }

        let now = Instant::now();
        let events = state.advance(now.duration_since(last_frame));
        last_frame = now;

        beeper.play(&events, &mut io::stdout());
    }

    info!(score = state.score, "quit");
    Ok(())
}

fn start_session(cli: &Cli) -> Result<(GameConfig, GameState), ConfigError> {
    let overrides = ConfigOverrides {
        cols: cli.cols,
        rows: cli.rows,
        tick_interval_ms: cli.tick_ms,
    };
    let config = GameConfig::resolve(cli.config.as_deref(), overrides)?;

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed)?,
        None => GameState::new(config)?,
    };
    Ok((config, state))
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
