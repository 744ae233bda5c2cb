pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use layover_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};

use crate::commands::energy::EnergyArgs;
use crate::commands::page::PageArgs;
use crate::commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "layover",
    about = "Layover amenity recommendations",
    long_about = "Rank airport amenities for a traveler's layover, run catalog searches, and suggest an energy level.",
    after_help = "Examples:\n  layover page --catalog amenities.json --terminal T1 --layover-minutes 25\n  layover recommend --catalog amenities.json --query coffee --location T2\n  layover suggest-energy --mood chill\n  layover config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: layover.toml or config/layover.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Render one page of the ranked amenity carousel")]
    Page(PageArgs),
    #[command(about = "Search a catalog and return ranked recommendations with fallbacks")]
    Recommend(RecommendArgs),
    #[command(name = "suggest-energy", about = "Suggest an energy level for the current time")]
    SuggestEnergy(EnergyArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

/// Install the stderr subscriber. Falls back to defaults when the config
/// cannot be loaded; the command itself reports that failure.
fn init_logging(logging: &LoggingConfig) {
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!(event_name = "cli.logging.already_installed", "subscriber already set");
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions { config_path: cli.config.clone(), ..LoadOptions::default() };

    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    init_logging(&logging);

    let result = match &cli.command {
        Command::Page(args) => commands::page::run(args, &options),
        Command::Recommend(args) => commands::recommend::run(args, &options),
        Command::SuggestEnergy(args) => commands::energy::run(args),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
