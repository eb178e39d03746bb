//! imgsearch CLI - build and query a topic index over remote images.
//!
//! # Usage
//!
//! ```bash
//! # Build the index (classifies every image on the candidate list)
//! imgsearch build --apikey YOUR_CLARIFAI_KEY
//!
//! # Build from a custom candidate list
//! imgsearch build -k YOUR_KEY -u https://example.com/images.txt
//!
//! # Query the persisted index
//! imgsearch search metro
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// imgsearch - search for images by topic using a Clarifai-built index.
#[derive(Parser, Debug)]
#[command(name = "imgsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the search index from scratch
    Build(cli::build::BuildArgs),

    /// Search the persisted index for images by topic
    Search(cli::search::SearchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go to stderr directly.
    let config = match imgsearch_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {e}\n  Using default configuration.");
            imgsearch_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("imgsearch v{}", imgsearch_core::VERSION);

    match cli.command {
        Commands::Build(args) => cli::build::execute(args, &config).await,
        Commands::Search(args) => cli::search::execute(args, &config).await,
    }
}
