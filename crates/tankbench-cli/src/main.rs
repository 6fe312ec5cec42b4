use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use tankbench_core::analysis::OutcomeAnalyzer;
use tankbench_core::app::EpisodeBuilder;
use tankbench_core::config::{BenchConfig, LogFormat};
use tankbench_core::domain::Frame;
use tankbench_core::impls::{
    RecordingActuator, ReplayFrameSource, ReplyParser, ScriptedDecider, load_image,
};
use tankbench_core::ports::SystemClock;

#[derive(Parser)]
#[command(name = "tankbench")]
#[command(version, about = "Shot outcome analysis for artillery-game agents", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "tankbench.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,

    /// Log file path (JSON, in addition to stderr)
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one shot from a before/after screenshot pair
    Analyze {
        #[arg(long)]
        before: PathBuf,
        #[arg(long)]
        after: PathBuf,
    },
    /// Replay saved screenshots against recorded agent replies
    Replay {
        /// Directory of screenshots, played in file-name order
        #[arg(long)]
        frames: PathBuf,
        /// JSON array of reply strings, or one reply per line
        #[arg(long)]
        replies: PathBuf,
        /// Turns per game (default: episode.turns_per_game)
        #[arg(long)]
        turns: Option<u32>,
        /// Games to play (default: episode.games_per_session)
        #[arg(long)]
        games: Option<u32>,
    },
    /// Generate a default config file
    GenerateConfig {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate config without running
    ValidateConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Commands::GenerateConfig { output } = &cli.command {
        let text = BenchConfig::default().to_toml()?;
        match output {
            Some(path) => {
                std::fs::write(path, text)?;
                eprintln!("Generated config file: {}", path.display());
            }
            None => print!("{text}"),
        }
        return Ok(());
    }

    let (config, found) = load_config(&cli.config)?;
    setup_logging(&config, &cli)?;
    if !found {
        tracing::info!(path = %cli.config.display(), "config file not found, using defaults");
    }

    match cli.command {
        Commands::Analyze { before, after } => analyze(&config, before, after).await,
        Commands::Replay {
            frames,
            replies,
            turns,
            games,
        } => replay(config, &frames, &replies, turns, games).await,
        Commands::ValidateConfig => {
            tracing::info!(path = %cli.config.display(), "config is valid");
            Ok(())
        }
        Commands::GenerateConfig { .. } => Ok(()),
    }
}

/// Config plus whether the file was actually there.
fn load_config(path: &Path) -> Result<(BenchConfig, bool), Box<dyn Error>> {
    let found = path.exists();
    Ok((BenchConfig::load(path)?, found))
}

async fn analyze(config: &BenchConfig, before: PathBuf, after: PathBuf) -> Result<(), Box<dyn Error>> {
    let before = Frame::from_image(load_image(before).await?);
    let after = Frame::from_image(load_image(after).await?);

    let outcome = OutcomeAnalyzer::new(config.analyzer.clone()).analyze(&before, &after)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn replay(
    mut config: BenchConfig,
    frames: &Path,
    replies: &Path,
    turns: Option<u32>,
    games: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    if let Some(turns) = turns {
        config.episode.turns_per_game = turns;
    }
    let turns = config.episode.turns_per_game;
    let games = games.unwrap_or(config.episode.games_per_session);
    let parser = ReplyParser::new(config.episode.max_move_steps);
    let replies = read_replies(replies)?;
    tracing::info!(replies = replies.len(), turns, games, "starting replay");

    let mut runner = EpisodeBuilder::new()
        .config(config)
        .frames(ReplayFrameSource::from_dir(frames, SystemClock)?)
        .decider(ScriptedDecider::new(replies).with_parser(parser))
        .actuator(RecordingActuator::new())
        .build()?;

    let json = if games == 1 {
        serde_json::to_string_pretty(&runner.run_episode(turns).await)?
    } else {
        serde_json::to_string_pretty(&runner.run_session(games).await)?
    };
    println!("{json}");
    Ok(())
}

fn read_replies(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    if let Ok(replies) = serde_json::from_str::<Vec<String>>(&content) {
        return Ok(replies);
    }
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn setup_logging(config: &BenchConfig, cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level = cli.log_level.as_ref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let format = cli
        .log_format
        .as_deref()
        .unwrap_or(match config.logging.format {
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
        });

    let log_file = cli.log_file.as_ref().or(config.logging.log_file.as_ref());

    // stdout carries the JSON results, so logs go to stderr
    if let Some(log_path) = log_file {
        let file = Mutex::new(std::fs::File::create(log_path)?);

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json();
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .json();

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        eprintln!("Logging to file: {log_path}");
    } else {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        match format {
            "json" => builder.json().init(),
            "compact" => builder.compact().init(),
            _ => builder.pretty().init(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_reported_as_not_found() {
        let (config, found) = load_config(Path::new("/definitely/not/here/tankbench.toml")).unwrap();
        assert!(!found);
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn replies_file_accepts_json_array_or_lines() {
        let dir = std::env::temp_dir();
        let json = dir.join(format!("tankbench-replies-{}.json", std::process::id()));
        std::fs::write(&json, r#"["{\"angle_delta\": 1}", "plain"]"#).unwrap();
        assert_eq!(read_replies(&json).unwrap(), vec![r#"{"angle_delta": 1}"#, "plain"]);

        let lines = dir.join(format!("tankbench-replies-{}.txt", std::process::id()));
        std::fs::write(&lines, "{\"angle_delta\": 1}\n\n  second  \n").unwrap();
        assert_eq!(read_replies(&lines).unwrap(), vec![r#"{"angle_delta": 1}"#, "second"]);

        std::fs::remove_file(json).unwrap();
        std::fs::remove_file(lines).unwrap();
    }
}
