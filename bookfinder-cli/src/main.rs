//! Bookfinder CLI - search Open Library and keep a list of favorite books

mod commands;
mod render;

use anyhow::{Context, Result};
use bookfinder_core::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a page argument (must be at least 1)
fn parse_page(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("page must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "bookfinder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding saved favorites [env: BOOKFINDER_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the search API [env: BOOKFINDER_API_URL]
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search books by title
    Search {
        /// Title to search for
        title: String,

        /// Result page (1-based)
        #[arg(short, long, default_value = "1", value_parser = parse_page)]
        page: u32,

        /// Only show results whose author contains this text
        #[arg(short, long)]
        author: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a search result to favorites
    Save {
        /// Title to search for
        title: String,

        /// Key of the result to save, e.g. /works/OL893415W
        key: String,

        /// Result page the book appears on
        #[arg(short, long, default_value = "1", value_parser = parse_page)]
        page: u32,
    },

    /// List favorite books
    Favorites {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a book from favorites
    Unsave {
        /// Key of the favorite to remove
        key: String,
    },

    /// Remove all favorites
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookfinder_cli=debug,bookfinder_core=debug"
    } else {
        "bookfinder_cli=info,bookfinder_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Search {
            title,
            page,
            author,
            json,
        } => commands::search(&config, &title, page, author.as_deref(), json).await,

        Commands::Save { title, key, page } => commands::save(&config, &title, &key, page).await,

        Commands::Favorites { json } => commands::favorites(&config, json),

        Commands::Unsave { key } => commands::unsave(&config, &key),

        Commands::Clear => commands::clear(&config),
    }
}
