//! Runtime configuration

use crate::error::{BookfinderError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://openlibrary.org";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";
pub const DEFAULT_DATA_DIR: &str = "./bookfinder_data";

/// Storage key holding the favorites snapshot
pub const DEFAULT_FAVORITES_KEY: &str = "favoriteBooks";

/// Maximum number of favorites kept
pub const DEFAULT_FAVORITES_CAPACITY: usize = 50;

pub const DEFAULT_USER_AGENT: &str = concat!("bookfinder/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the search API and of book detail pages
    pub api_url: String,

    /// Base URL of the cover image service
    pub covers_url: String,

    /// Directory holding persisted state
    pub data_dir: PathBuf,

    pub favorites_key: String,

    pub favorites_capacity: usize,

    /// Upper bound for a single search request
    pub request_timeout: Duration,

    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            favorites_capacity: DEFAULT_FAVORITES_CAPACITY,
            request_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with `BOOKFINDER_*` environment variables
    ///
    /// Not validated: callers apply their own overrides, then call
    /// [`Config::validate`].
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("BOOKFINDER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("BOOKFINDER_API_URL") {
            config.api_url = url;
        }
        if let Ok(url) = std::env::var("BOOKFINDER_COVERS_URL") {
            config.covers_url = url;
        }
        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Check that URLs are absolute http(s) URLs and the capacity is usable
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("api_url", &self.api_url), ("covers_url", &self.covers_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(BookfinderError::Config(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }
        if self.favorites_capacity == 0 {
            return Err(BookfinderError::Config(
                "favorites_capacity must be at least 1".to_string(),
            ));
        }
        if self.favorites_key.is_empty() {
            return Err(BookfinderError::Config(
                "favorites_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
