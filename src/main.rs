use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use neon_snake::game::GameConfig;
use neon_snake::modes::HumanMode;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Arcade snake with lives, levels and power-ups")]
struct Cli {
    /// JSON file with game settings; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width and height (overrides the config file)
    #[arg(long)]
    grid_size: Option<usize>,

    /// Starting lives (overrides the config file)
    #[arg(long)]
    lives: Option<u32>,

    /// Seed for food and power-up placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log; the terminal belongs to the game
    #[arg(long, default_value = "neon_snake.log")]
    log_file: PathBuf,

    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(lives) = self.lives {
            config.initial_lives = lives;
        }

        config
            .validate()
            .map_err(|reason| anyhow::anyhow!("Invalid settings: {}", reason))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("starting with {:?}", config);

    let mut human_mode = HumanMode::new(config, cli.seed)?;
    human_mode.run().await?;

    Ok(())
}
