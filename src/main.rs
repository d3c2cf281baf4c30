use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use offline_arcade::config::ArcadeConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(
    name = "offline-arcade",
    about = "Localize iframe-wrapped HTML5 games so they run offline",
    version
)]
struct Cli {
    /// Configuration file (defaults to arcade.config.json in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding one folder per game, overriding the configuration
    #[arg(long, global = true)]
    games_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the game behind each iframe wrapper, or undo that with --restore
    Localize {
        /// Game folder names to process
        #[arg(required_unless_present_any = ["all", "restore"])]
        ids: Vec<String>,
        /// Process every game folder
        #[arg(long, conflicts_with = "ids")]
        all: bool,
        /// Put the original wrapper pages back (every game when no ids are given)
        #[arg(long, alias = "undo")]
        restore: bool,
    },
    /// List games whose index.html is still an iframe wrapper
    Scan,
    /// Regenerate games-list.json and games-metadata.json
    Catalog,
    /// Serve the catalog API and the game folders
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5173")]
        port: u16,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ArcadeConfig> {
    let mut config = match &cli.config {
        Some(path) => ArcadeConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ArcadeConfig::discover(&std::env::current_dir()?),
    };
    if let Some(games_dir) = &cli.games_dir {
        config.games_dir = games_dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Localize { ids, all, restore } => {
            cli::localize_cmd::run(config, ids, all, restore).await
        }
        Commands::Scan => cli::scan_cmd::run(config),
        Commands::Catalog => cli::catalog_cmd::run(config),
        Commands::Serve { port } => cli::serve_cmd::run(config, port).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
