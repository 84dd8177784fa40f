//! Favorites command implementations

use super::search::run_search;
use crate::render;
use anyhow::{bail, Context, Result};
use bookfinder_core::{Config, FavoritesStore, FileStore};
use std::sync::Arc;

fn open_store(config: &Config) -> FavoritesStore {
    let storage = Arc::new(FileStore::new(&config.data_dir));
    FavoritesStore::load_with_config(storage, config)
}

/// Search for `title` and save the result with `key`
pub async fn save(config: &Config, title: &str, key: &str, page: u32) -> Result<()> {
    let session = run_search(config, title, page, true).await?;
    if let Some(error) = session.error() {
        bail!("Search failed: {}", error);
    }

    let book = session
        .results()
        .iter()
        .find(|book| book.key == key)
        .with_context(|| format!("No result with key {} on page {} for \"{}\"", key, page, title))?;

    let mut favorites = open_store(config);
    if favorites.add_record(book) {
        println!("Saved \"{}\" ({} favorites)", book.title, favorites.len());
    } else {
        println!("\"{}\" is already in favorites", book.title);
    }
    Ok(())
}

/// List saved favorites
pub fn favorites(config: &Config, json: bool) -> Result<()> {
    let favorites = open_store(config);
    let views = render::book_views(favorites.items().iter(), config);

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else if views.is_empty() {
        println!("No favorites saved yet");
    } else {
        println!("{} favorites:", views.len());
        render::print_books(&views);
    }
    Ok(())
}

/// Remove one favorite
pub fn unsave(config: &Config, key: &str) -> Result<()> {
    let mut favorites = open_store(config);
    if !favorites.remove(key) {
        bail!("No favorite with key {}", key);
    }
    println!("Removed {} ({} favorites left)", key, favorites.len());
    Ok(())
}

/// Remove every favorite
pub fn clear(config: &Config) -> Result<()> {
    let mut favorites = open_store(config);
    let count = favorites.len();
    favorites.clear();
    println!("Cleared {} favorites", count);
    Ok(())
}
