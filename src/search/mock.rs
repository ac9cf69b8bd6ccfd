use super::SearchService;
use crate::models::{Failure, ImageHit, SearchOutcome, SearchResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory [`SearchService`] that serves canned hits and records calls.
pub struct MockSearchClient {
    hits: Arc<Mutex<Vec<ImageHit>>>,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<(String, u32, u32)>>>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_hits(self, hits: Vec<ImageHit>) -> Self {
        self.hits.lock().unwrap().extend(hits);
        self
    }

    pub fn with_failure(mut self, message: String) -> Self {
        self.failure = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(query, page, per_page)` for each non-empty query received.
    pub fn calls(&self) -> Vec<(String, u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchService for MockSearchClient {
    async fn search(&self, query: &str, page: u32, per_page: u32) -> SearchOutcome {
        let page = page.max(1);
        if query.trim().is_empty() {
            return Ok(SearchResult::empty(page));
        }

        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), page, per_page));

        if let Some(message) = &self.failure {
            return Err(Failure::new(message.clone()));
        }

        let hits: Vec<ImageHit> = self
            .hits
            .lock()
            .unwrap()
            .iter()
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok(SearchResult::from_hits(hits, page, per_page))
    }
}
