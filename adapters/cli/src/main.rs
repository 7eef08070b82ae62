#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Goblin Hunt in the terminal.

mod autoplay;
mod config;
mod logging;
mod runner;
mod script;
mod terminal;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use goblin_hunt_core::{Theme, WELCOME_BANNER};
use tracing::info;

use crate::{
    autoplay::Autoplayer,
    config::{GameConfig, Overrides},
};

/// Spot the goblin before it slips away.
#[derive(Debug, Parser)]
#[command(name = "goblin-hunt", version, about)]
struct Cli {
    /// TOML file with board and timing settings.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Number of cells along each board edge.
    #[arg(long, value_name = "CELLS", global = true)]
    board_size: Option<u32>,
    /// Seed for target placement; omit for a fresh game every run.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Milliseconds between spawn ticks.
    #[arg(long, value_name = "MS", global = true)]
    tick_ms: Option<u64>,
    /// Milliseconds before the safety timeout stops spawning.
    #[arg(long, value_name = "MS", global = true)]
    safety_ms: Option<u64>,
    /// Board theme: prairie, desert, arctic or mountain.
    #[arg(long, value_parser = config::parse_theme, global = true)]
    theme: Option<Theme>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Read commands from stdin and redraw the board after each one.
    Play,
    /// Run a script of commands deterministically.
    Replay {
        /// Script file using the same commands as `play`.
        script: PathBuf,
        /// Print the event transcript as JSON lines.
        #[arg(long)]
        events: bool,
    },
    /// Let a simulated player finish one session.
    Autoplay {
        /// Probability that a click lands on the goblin.
        #[arg(long, default_value_t = 0.8, value_parser = autoplay::parse_accuracy)]
        accuracy: f64,
        /// Milliseconds the player waits before each click.
        #[arg(long, default_value_t = 400, value_parser = clap::value_parser!(u64).range(1..))]
        reaction_ms: u64,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            board_size: self.board_size,
            tick_ms: self.tick_ms,
            safety_ms: self.safety_ms,
            seed: self.seed,
            theme: self.theme,
        }
    }
}

/// Entry point for the Goblin Hunt command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = GameConfig::load(cli.config.as_deref(), cli.overrides())?;
    info!(
        board_size = config.geometry().size(),
        seed = ?config.seed(),
        "configuration loaded"
    );

    let stdout = io::stdout();
    let mut output = stdout.lock();
    match cli.mode.unwrap_or(Mode::Play) {
        Mode::Play => runner::play(&config, io::stdin().lock(), &mut output),
        Mode::Replay { script, events } => runner::replay(&config, &script, events, &mut output),
        Mode::Autoplay {
            accuracy,
            reaction_ms,
        } => {
            writeln!(output, "{WELCOME_BANNER}")?;
            let mut events = Vec::new();
            let mut game = runner::start(&config, &mut events)?;
            let mut player =
                Autoplayer::new(config.seed(), accuracy, Duration::from_millis(reaction_ms));
            let outcome = player.play(&mut game, &mut events)?;
            info!(?outcome, "autoplay finished");
            runner::report(&game, &events, &mut output)
        }
    }
}
