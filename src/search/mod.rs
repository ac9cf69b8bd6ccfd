//! Stock photo search
//!
//! Wraps the Pexels search API behind [`SearchService`] so handlers get a
//! normalized [`SearchResult`](crate::models::SearchResult) or a `Failure`.

pub mod mock;
pub mod pexels;
pub mod types;

pub use mock::MockSearchClient;
pub use pexels::PexelsSearchClient;

use crate::models::SearchOutcome;
use async_trait::async_trait;

#[async_trait]
pub trait SearchService: Send + Sync {
    /// Fetch one page of results. An empty query is a no-op, not an error.
    async fn search(&self, query: &str, page: u32, per_page: u32) -> SearchOutcome;
}
