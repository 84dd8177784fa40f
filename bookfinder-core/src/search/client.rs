//! HTTP client for the Open Library title search

use crate::config::Config;
use crate::error::SearchError;
use async_trait::async_trait;
use serde_json::Value;

/// A source of title search results
///
/// Implementations return the raw response body; normalization happens in
/// [`super::parse_search_page`].
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetch one page (1-based) of results for a title query
    async fn search_title(&self, title: &str, page: u32) -> Result<Value, SearchError>;
}

/// Open Library `search.json` client
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &Config) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL for one page of a title query
    pub fn search_url(&self, title: &str, page: u32) -> String {
        format!(
            "{}/search.json?title={}&page={}",
            self.base_url,
            urlencoding::encode(title),
            page
        )
    }
}

#[async_trait]
impl SearchApi for OpenLibraryClient {
    async fn search_title(&self, title: &str, page: u32) -> Result<Value, SearchError> {
        let url = self.search_url(title, page);
        tracing::debug!(%url, "Searching");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| SearchError::InvalidBody(e.to_string()))
    }
}
