use anyhow::{Context, Result};
use arcade_snake::modes::{PlayMode, PlayOptions};
use arcade_snake::storage::{Leaderboard, Settings};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Terminal snake with bonus food and a local leaderboard")]
struct Cli {
    /// What to do
    #[arg(long, value_enum, default_value = "play")]
    mode: Mode,

    /// Grid width (overrides the settings file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the settings file)
    #[arg(long)]
    height: Option<usize>,

    /// Speed level from 1 (slow) to 10 (fast), overrides the settings file
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    speed: Option<u8>,

    /// Name recorded on the leaderboard
    #[arg(long, default_value = "player")]
    username: String,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Leaderboard file
    #[arg(long, default_value = "leaderboard.json")]
    leaderboard: PathBuf,

    /// Log file; the terminal itself is used by the game
    #[arg(long, default_value = "arcade_snake.log")]
    log_file: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Play,
    /// Print the leaderboard
    Scores,
    /// Empty the leaderboard
    ClearScores,
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}

fn print_scores(leaderboard: &Leaderboard) {
    if leaderboard.entries().is_empty() {
        println!("No scores yet.");
        return;
    }

    println!("{:>3}  {:<16} {:>6}  {}", "#", "Player", "Score", "Date");
    for (i, entry) in leaderboard.entries().iter().enumerate() {
        println!(
            "{:>3}  {:<16} {:>6}  {}",
            i + 1,
            entry.username,
            entry.score,
            entry.date
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file, cli.log_level)?;
    info!("Starting arcade_snake {}", env!("CARGO_PKG_VERSION"));

    match cli.mode {
        Mode::Play => {
            // CLI values take precedence over the stored settings
            let mut settings = Settings::load_or_default(&cli.settings);
            if let Some(width) = cli.width {
                settings.grid_width = width;
            }
            if let Some(height) = cli.height {
                settings.grid_height = height;
            }
            if let Some(speed) = cli.speed {
                settings.speed_level = speed;
            }

            let options = PlayOptions {
                settings,
                settings_path: cli.settings,
                leaderboard_path: cli.leaderboard,
                username: cli.username,
                seed: cli.seed,
            };

            let mut play_mode = PlayMode::new(options)?;
            play_mode.run().await?;
        }
        Mode::Scores => {
            let leaderboard = Leaderboard::load(&cli.leaderboard)?;
            print_scores(&leaderboard);
        }
        Mode::ClearScores => {
            let mut leaderboard = Leaderboard::load_or_default(&cli.leaderboard);
            leaderboard.clear();
            leaderboard.save()?;
            println!("Leaderboard cleared.");
        }
    }

    Ok(())
}
