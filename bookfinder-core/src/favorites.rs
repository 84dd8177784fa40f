//! Persisted, deduplicated and capacity-bounded list of favorite books

use crate::config::Config;
use crate::normalize::{normalize_favorite, normalize_stored, source_key, NormalizePath};
use crate::storage::KeyValueStore;
use crate::types::BookRecord;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Favorite books, most recently added first
///
/// Every mutation re-persists the whole collection. Persist failures are
/// logged and swallowed; the in-memory list stays authoritative.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    items: Vec<BookRecord>,
}

impl FavoritesStore {
    /// Load favorites from storage
    ///
    /// A missing value yields an empty list. A value that is not a JSON array
    /// is removed from storage and also yields an empty list. Individual
    /// malformed entries are repaired by normalization, never dropped. Entries
    /// that had to be given a key are written back so the key survives reloads.
    pub fn load(storage: Arc<dyn KeyValueStore>, key: impl Into<String>, capacity: usize) -> Self {
        let key = key.into();
        let (items, rekeyed) = read_snapshot(storage.as_ref(), &key, capacity);
        tracing::debug!(key = %key, count = items.len(), "Loaded favorites");
        let store = Self {
            storage,
            key,
            capacity,
            items,
        };
        if rekeyed {
            tracing::info!("Assigned keys to stored favorites without one");
            store.persist();
        }
        store
    }

    pub fn load_with_config(storage: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::load(storage, config.favorites_key.clone(), config.favorites_capacity)
    }

    /// Favorite a raw book value; returns `false` if its key is already saved
    pub fn add(&mut self, raw: &Value) -> bool {
        let book = normalize_favorite(raw);
        if self.contains(&book.key) {
            tracing::debug!(key = %book.key, "Book already in favorites");
            return false;
        }
        self.items.insert(0, book);
        self.items.truncate(self.capacity);
        self.persist();
        true
    }

    /// Favorite an already normalized record
    pub fn add_record(&mut self, book: &BookRecord) -> bool {
        match serde_json::to_value(book) {
            Ok(raw) => self.add(&raw),
            Err(e) => {
                tracing::error!("Failed to serialize book {}: {}", book.key, e);
                false
            }
        }
    }

    /// Remove the favorite with `key`; returns `false` if it was not saved
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|book| book.key != key);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Remove every favorite and delete the persisted value
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::error!("Failed to remove favorites from storage: {}", e);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|book| book.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&BookRecord> {
        self.items.iter().find(|book| book.key == key)
    }

    pub fn items(&self) -> &[BookRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) {
        let data = match serde_json::to_string(&self.items) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to serialize favorites: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &data) {
            tracing::error!("Failed to save favorites to storage: {}", e);
        }
    }
}

/// Parse the stored snapshot; the flag is set when any entry lacked a key
fn read_snapshot(
    storage: &dyn KeyValueStore,
    key: &str,
    capacity: usize,
) -> (Vec<BookRecord>, bool) {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), false),
        Err(e) => {
            tracing::warn!("Failed to read favorites from storage: {}", e);
            return (Vec::new(), false);
        }
    };

    let entries = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!("Stored favorites are not an array, resetting");
            reset(storage, key);
            return (Vec::new(), false);
        }
        Err(e) => {
            tracing::warn!("Stored favorites are not valid JSON, resetting: {}", e);
            reset(storage, key);
            return (Vec::new(), false);
        }
    };

    let rekeyed = entries
        .iter()
        .take(capacity)
        .any(|entry| source_key(entry, NormalizePath::Stored).is_none());

    let mut seen = HashSet::new();
    let items = entries
        .iter()
        .map(normalize_stored)
        .filter(|book| seen.insert(book.key.clone()))
        .take(capacity)
        .collect();
    (items, rekeyed)
}

fn reset(storage: &dyn KeyValueStore, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::error!("Failed to remove corrupt favorites: {}", e);
    }
}
