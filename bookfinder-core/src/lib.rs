//! Bookfinder Core Library
//!
//! Title search against Open Library and a locally persisted favorites list.
//! Raw API and storage data only ever enters through [`normalize`], which
//! turns it into the typed [`BookRecord`] every other module works with.

pub mod config;
pub mod error;
pub mod favorites;
pub mod links;
pub mod normalize;
pub mod search;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{BookfinderError, Result, SearchError, StorageError};
pub use favorites::FavoritesStore;
pub use links::CoverSize;
pub use normalize::{
    normalize, normalize_favorite, normalize_search_doc, normalize_search_doc_at,
    normalize_stored, NormalizePath,
};
pub use search::{OpenLibraryClient, SearchApi, SearchSession, SearchStatus};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{BookRecord, CoverId, PublishYear};
