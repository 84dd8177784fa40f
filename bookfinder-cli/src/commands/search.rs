//! Search command implementation

use crate::render::{self, SearchReport};
use anyhow::{bail, Context, Result};
use bookfinder_core::{Config, OpenLibraryClient, SearchSession, SearchStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Search books by title and print the visible results
pub async fn search(
    config: &Config,
    title: &str,
    page: u32,
    author: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut session = run_search(config, title, page, !json).await?;
    if let Some(author) = author {
        session.set_author_filter(author);
    }

    let report = SearchReport::new(&session, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_search(&report);
    }

    if let Some(error) = session.error() {
        bail!("Search failed: {}", error);
    }
    Ok(())
}

/// Run one search cycle for `title` at `page` and return the settled session
pub(crate) async fn run_search(
    config: &Config,
    title: &str,
    page: u32,
    spinner: bool,
) -> Result<SearchSession> {
    if title.trim().is_empty() {
        bail!("Search title must not be empty");
    }

    let client = OpenLibraryClient::new(config).context("Failed to build HTTP client")?;
    let mut session = SearchSession::new(Arc::new(client));

    let mut pending = session.set_query(title);
    if page > 1 {
        pending = session.set_page(page);
    }

    let progress = if spinner {
        loading_spinner(title, page)
    } else {
        ProgressBar::hidden()
    };
    let status = session.resolve(pending).await;
    progress.finish_and_clear();

    tracing::debug!(?status, num_found = session.num_found(), "Search settled");
    if status == SearchStatus::Loading {
        bail!("Search did not complete");
    }
    Ok(session)
}

fn loading_spinner(title: &str, page: u32) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Searching \"{}\" (page {})...", title, page));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
