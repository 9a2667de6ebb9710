//! pageqa: ask questions about web pages
//!
//! Fetches pages, extracts their readable text, and answers questions over
//! the combined text with an extractive QA model.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pageqa::config::Config;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pageqa")]
#[command(about = "Extract text from web pages and answer questions about it")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pageqa.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API and UI
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Fetch one page and print its extracted text
    Extract {
        /// Page URL
        url: String,
    },

    /// Process URLs and answer a single question
    Ask {
        /// Page URLs to use as context
        #[arg(short, long = "url", required = true)]
        urls: Vec<String>,

        /// The question
        question: String,
    },

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            let config = load_config(&cli.config, cli.verbose)?;
            commands::serve::serve(config, listen).await
        }
        Commands::Extract { url } => {
            let config = load_config(&cli.config, cli.verbose)?;
            commands::extract::extract_page(config, url).await
        }
        Commands::Ask { urls, question } => {
            let config = load_config(&cli.config, cli.verbose)?;
            commands::ask::ask_once(config, urls, question).await
        }
        Commands::Init { path } => {
            Config::default().logging.init(cli.verbose)?;
            commands::init::init_config(path).await
        }
    }
}

/// Load the config file (defaults if missing) and install logging
fn load_config(path: &Path, verbose: u8) -> Result<Config> {
    let config = Config::load_or_default(path)?;
    config.logging.init(verbose)?;
    Ok(config)
}
