//! Search session: query, page and result state with stale-response suppression
//!
//! Every query or page change starts a new request cycle. Starting a cycle
//! cancels the previous request's token and bumps the session generation, so
//! an outcome from an older cycle is ignored by [`SearchSession::apply`] even
//! if it arrives after the newer one.

use super::client::SearchApi;
use super::response::{parse_search_page, SearchPage};
use crate::error::SearchError;
use crate::types::BookRecord;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Message shown when a failure carries no description
pub const GENERIC_ERROR: &str = "Failed to fetch books.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// No query entered
    Idle,
    /// A request is in flight
    Loading,
    Success,
    Failed,
}

/// A started request cycle, not yet resolved
pub struct PendingSearch {
    generation: u64,
    token: CancellationToken,
    api: Arc<dyn SearchApi>,
    query: String,
    page: u32,
}

impl PendingSearch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Perform the request, resolving early with `Cancelled` if superseded
    pub async fn run(self) -> SearchOutcome {
        let result = tokio::select! {
            _ = self.token.cancelled() => Err(SearchError::Cancelled),
            body = self.api.search_title(&self.query, self.page) => {
                body.map(|body| parse_search_page(&body))
            }
        };
        SearchOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// The resolution of a request cycle
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub result: Result<SearchPage, SearchError>,
}

pub struct SearchSession {
    api: Arc<dyn SearchApi>,
    query: String,
    page: u32,
    author_filter: String,
    status: SearchStatus,
    results: Vec<BookRecord>,
    num_found: u64,
    error: Option<String>,
    /// Status and error from before the in-flight request, restored on cancel
    settled: (SearchStatus, Option<String>),
    generation: u64,
    current: Option<CancellationToken>,
}

impl SearchSession {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self {
            api,
            query: String::new(),
            page: 1,
            author_filter: String::new(),
            status: SearchStatus::Idle,
            results: Vec::new(),
            num_found: 0,
            error: None,
            settled: (SearchStatus::Idle, None),
            generation: 0,
            current: None,
        }
    }

    /// Change the query; resets to page 1
    ///
    /// A blank query cancels any in-flight request and returns to `Idle`.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<PendingSearch> {
        self.query = query.into();
        self.page = 1;
        self.restart()
    }

    /// Explicit search of the current query from page 1
    pub fn submit(&mut self) -> Option<PendingSearch> {
        self.page = 1;
        self.restart()
    }

    /// Jump to a page (clamped to 1); `None` if the page did not change
    pub fn set_page(&mut self, page: u32) -> Option<PendingSearch> {
        let page = page.max(1);
        if page == self.page {
            return None;
        }
        self.page = page;
        self.restart()
    }

    pub fn next_page(&mut self) -> Option<PendingSearch> {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<PendingSearch> {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Apply the outcome of a request cycle
    ///
    /// Returns `false` when the outcome was ignored: it belongs to a
    /// superseded cycle or was cancelled.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.generation || self.status != SearchStatus::Loading {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "Ignoring stale search outcome"
            );
            return false;
        }

        match outcome.result {
            Ok(page) => {
                tracing::debug!(
                    num_found = page.num_found,
                    docs = page.docs.len(),
                    "Search complete"
                );
                self.num_found = page.num_found;
                self.results = page.docs;
                self.error = None;
                self.status = SearchStatus::Success;
            }
            Err(e) if e.is_cancelled() => return false,
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                let message = e.to_string();
                self.error = Some(if message.trim().is_empty() {
                    GENERIC_ERROR.to_string()
                } else {
                    message
                });
                self.results.clear();
                self.num_found = 0;
                self.status = SearchStatus::Failed;
            }
        }
        self.current = None;
        true
    }

    /// Set the query, run its request and apply the outcome
    pub async fn search(&mut self, query: impl Into<String>) -> SearchStatus {
        if let Some(pending) = self.set_query(query) {
            let outcome = pending.run().await;
            self.apply(outcome);
        }
        self.status
    }

    /// Run and apply a pending request from this session
    pub async fn resolve(&mut self, pending: Option<PendingSearch>) -> SearchStatus {
        if let Some(pending) = pending {
            let outcome = pending.run().await;
            self.apply(outcome);
        }
        self.status
    }

    /// Cancel the in-flight request, if any
    ///
    /// The session goes back to the status and error it had before that
    /// request started. Results are untouched while loading, so they still
    /// belong to that status.
    pub fn cancel(&mut self) {
        self.abort();
        if self.status == SearchStatus::Loading {
            let (status, error) = std::mem::replace(&mut self.settled, (SearchStatus::Idle, None));
            tracing::debug!(generation = self.generation, ?status, "Search cancelled");
            self.status = status;
            self.error = error;
        }
    }

    fn abort(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    pub fn set_author_filter(&mut self, filter: impl Into<String>) {
        self.author_filter = filter.into();
    }

    pub fn author_filter(&self) -> &str {
        &self.author_filter
    }

    /// Results whose author contains the filter text, ignoring case
    pub fn filtered_results(&self) -> Vec<&BookRecord> {
        self.results
            .iter()
            .filter(|book| book.author_matches(&self.author_filter))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.filtered_results().len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn results(&self) -> &[BookRecord] {
        &self.results
    }

    pub fn num_found(&self) -> u64 {
        self.num_found
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn restart(&mut self) -> Option<PendingSearch> {
        self.abort();
        self.generation += 1;

        if self.query.trim().is_empty() {
            self.status = SearchStatus::Idle;
            self.results.clear();
            self.num_found = 0;
            self.error = None;
            return None;
        }

        let token = CancellationToken::new();
        self.current = Some(token.clone());
        if self.status != SearchStatus::Loading {
            self.settled = (self.status, self.error.take());
        }
        self.status = SearchStatus::Loading;
        self.error = None;
        tracing::debug!(
            query = %self.query,
            page = self.page,
            generation = self.generation,
            "Starting search"
        );

        Some(PendingSearch {
            generation: self.generation,
            token,
            api: self.api.clone(),
            query: self.query.clone(),
            page: self.page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Answers from a fixed table; unknown queries fail with a 500
    struct StaticApi {
        bodies: HashMap<String, Value>,
    }

    #[async_trait]
    impl SearchApi for StaticApi {
        async fn search_title(&self, title: &str, page: u32) -> Result<Value, SearchError> {
            self.bodies
                .get(&format!("{}:{}", title, page))
                .cloned()
                .ok_or(SearchError::Status {
                    code: 500,
                    reason: "Internal Server Error".to_string(),
                })
        }
    }

    /// Blocks each query until the test releases it
    #[derive(Default)]
    struct GatedApi {
        gates: Mutex<HashMap<String, oneshot::Receiver<Value>>>,
    }

    impl GatedApi {
        fn gate(&self, title: &str) -> oneshot::Sender<Value> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(title.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl SearchApi for GatedApi {
        async fn search_title(&self, title: &str, _page: u32) -> Result<Value, SearchError> {
            let rx = self
                .gates
                .lock()
                .unwrap()
                .remove(title)
                .expect("gate registered");
            rx.await.map_err(|e| SearchError::Network(e.to_string()))
        }
    }

    fn doc(key: &str, title: &str, author: &str) -> Value {
        json!({ "key": key, "title": title, "author_name": [author] })
    }

    fn dune_api() -> Arc<StaticApi> {
        let mut bodies = HashMap::new();
        bodies.insert(
            "dune:1".to_string(),
            json!({
                "numFound": 2,
                "docs": [
                    doc("/works/OL1W", "Dune", "Frank Herbert"),
                    doc("/works/OL2W", "Dune Messiah", "Frank Herbert"),
                ]
            }),
        );
        bodies.insert(
            "dune:2".to_string(),
            json!({ "numFound": 2, "docs": [] }),
        );
        Arc::new(StaticApi { bodies })
    }

    #[tokio::test]
    async fn test_search_success_and_filter() {
        let mut session = SearchSession::new(dune_api());
        assert_eq!(session.search("dune").await, SearchStatus::Success);

        assert_eq!(session.num_found(), 2);
        assert_eq!(session.visible_count(), 2);

        session.set_author_filter("zzz");
        assert_eq!(session.visible_count(), 0);
        assert_eq!(session.results().len(), 2);

        session.set_author_filter("HERBERT");
        assert_eq!(session.visible_count(), 2);

        session.set_author_filter("");
        let all: Vec<&BookRecord> = session.results().iter().collect();
        assert_eq!(session.filtered_results(), all);
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_clears_results() {
        let mut session = SearchSession::new(dune_api());
        session.search("dune").await;
        assert_eq!(session.search("unknown").await, SearchStatus::Failed);

        assert!(session.results().is_empty());
        assert_eq!(session.num_found(), 0);
        assert_eq!(
            session.error(),
            Some("HTTP error! status: 500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn test_blank_query_goes_idle() {
        let mut session = SearchSession::new(dune_api());
        session.search("dune").await;

        assert!(session.set_query("   ").is_none());
        assert_eq!(session.status(), SearchStatus::Idle);
        assert!(session.results().is_empty());
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn test_pagination_floor_and_reset() {
        let mut session = SearchSession::new(dune_api());
        session.search("dune").await;

        assert!(session.prev_page().is_none());
        assert_eq!(session.page(), 1);
        assert!(session.set_page(0).is_none());
        assert_eq!(session.page(), 1);

        let pending = session.next_page();
        assert_eq!(pending.as_ref().map(PendingSearch::page), Some(2));
        session.resolve(pending).await;
        assert_eq!(session.page(), 2);
        assert!(session.results().is_empty());

        let pending = session.submit().expect("query is set");
        assert_eq!(pending.page(), 1);
        assert_eq!(session.page(), 1);
    }

    #[tokio::test]
    async fn test_stale_response_is_ignored() {
        let api = Arc::new(GatedApi::default());
        let foo_gate = api.gate("foo");
        let bar_gate = api.gate("bar");
        let mut session = SearchSession::new(api.clone());

        let foo = session.set_query("foo").unwrap();
        let foo_task = tokio::spawn(foo.run());
        tokio::task::yield_now().await;

        let bar = session.set_query("bar").unwrap();
        let bar_task = tokio::spawn(bar.run());

        bar_gate
            .send(json!({ "numFound": 1, "docs": [doc("/works/BAR", "Bar", "B")] }))
            .unwrap();
        assert!(session.apply(bar_task.await.unwrap()));

        // foo's body arrives after bar has been applied
        let _ = foo_gate.send(json!({ "numFound": 1, "docs": [doc("/works/FOO", "Foo", "F")] }));
        let foo_outcome = foo_task.await.unwrap();
        assert!(!session.apply(foo_outcome));

        assert_eq!(session.status(), SearchStatus::Success);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].key, "/works/BAR");
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn test_outcome_from_old_generation_is_ignored() {
        let mut session = SearchSession::new(dune_api());
        let old = session.set_query("dune").unwrap();
        let _new = session.set_query("unknown").unwrap();

        // Even a completed, uncancelled result is dropped once superseded
        let stale = SearchOutcome {
            generation: old.generation(),
            result: Ok(SearchPage {
                num_found: 9,
                docs: Vec::new(),
            }),
        };
        assert!(!session.apply(stale));
        assert_eq!(session.status(), SearchStatus::Loading);
        assert_eq!(session.num_found(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_outcome_leaves_state() {
        let api = Arc::new(GatedApi::default());
        let _gate = api.gate("slow");
        let mut session = SearchSession::new(api);

        let pending = session.set_query("slow").unwrap();
        let generation = pending.generation();
        session.cancel();
        let outcome = pending.run().await;

        assert_eq!(outcome.generation, generation);
        assert!(outcome.result.as_ref().unwrap_err().is_cancelled());
        assert!(!session.apply(outcome));
        assert_eq!(session.status(), SearchStatus::Idle);
        assert!(!session.is_loading());
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn test_cancel_keeps_previous_results() {
        let api = Arc::new(GatedApi::default());
        let dune_gate = api.gate("dune");
        let _slow_gate = api.gate("slow");
        let mut session = SearchSession::new(api);

        let pending = session.set_query("dune").unwrap();
        dune_gate
            .send(json!({ "numFound": 1, "docs": [doc("/works/OL1W", "Dune", "Frank Herbert")] }))
            .unwrap();
        assert!(session.apply(pending.run().await));

        let pending = session.set_query("slow").unwrap();
        assert!(session.is_loading());
        session.cancel();

        assert_eq!(session.status(), SearchStatus::Success);
        assert_eq!(session.results().len(), 1);
        assert!(!session.apply(pending.run().await));
        assert_eq!(session.status(), SearchStatus::Success);

        // Nothing in flight: cancelling again changes nothing
        session.cancel();
        assert_eq!(session.status(), SearchStatus::Success);
    }

    #[tokio::test]
    async fn test_cancel_after_failure_restores_error() {
        let mut session = SearchSession::new(dune_api());
        assert_eq!(session.search("unknown").await, SearchStatus::Failed);

        let _pending = session.set_query("dune").unwrap();
        assert_eq!(session.error(), None);
        session.cancel();

        assert_eq!(session.status(), SearchStatus::Failed);
        assert_eq!(
            session.error(),
            Some("HTTP error! status: 500 Internal Server Error")
        );
    }
}
