mod config;
mod engine;
mod error;
mod game;
mod scheduler;
mod snake;
mod term;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{FoodOnReset, GameConfig};
use error::SnakeError;

pub type TermInt = u16;
pub type ScreenPos = (TermInt, TermInt);
/// Position on the playing field, in units.
pub type Coords = (i32, i32);

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Seed for food placement, random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Draw a new food position after a game over instead of reusing the first one
    #[arg(long)]
    regenerate_food_on_reset: bool,

    /// Write logs here. The game owns the terminal, so nothing is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| SnakeError::LogFile {
        path: path.display().to_string(),
        source,
    })?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snake=info")))
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    info!("snake {} starting", env!("CARGO_PKG_VERSION"));

    let config = GameConfig {
        food_on_reset: if cli.regenerate_food_on_reset { FoodOnReset::Regenerate } else { FoodOnReset::Initial },
        ..GameConfig::default()
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = game::SnakeGame::new(config, rng).context("failed to open the terminal")?;
    game.initialize()?;

    // The terminal has to be restored whatever happened while playing
    let result = match game.show_intro() {
        Ok(true) => game.play(),
        Ok(false) => Ok(()),
        Err(e) => Err(e),
    };
    game.shutdown().context("failed to restore the terminal")?;
    result?;

    info!("snake exiting");
    Ok(())
}
