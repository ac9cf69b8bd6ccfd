//! Handler-facing facade over search and generation.
//!
//! Takes raw request parameters as strings and returns plain view contexts a
//! template renderer can consume directly.

use crate::generation::GenerationDispatcher;
use crate::models::{Config, GenerationRequest, GenerationResult, ImageHit, DEFAULT_PER_PAGE};
use crate::search::{PexelsSearchClient, SearchService};
use crate::Result;
use serde::Serialize;
use tracing::{info, warn};

/// Context for the search results page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchPage {
    pub query: String,
    pub images: Vec<ImageHit>,
    pub error_message: Option<String>,
    pub page: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: u32,
    pub prev_page: u32,
}

/// Context for the generation studio page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StudioPage {
    pub prompt: String,
    pub generated_image_data: Option<String>,
    pub error_message: Option<String>,
}

/// Owns the search client and the generation dispatcher.
pub struct Gateway {
    search: Box<dyn SearchService>,
    dispatcher: GenerationDispatcher,
    per_page: u32,
}

/// Parse a `page` query parameter; anything missing, non-numeric or below 1 is page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

impl Gateway {
    /// Build a gateway from concrete services. Useful for tests that inject mocks.
    pub fn with_services(
        search: Box<dyn SearchService>,
        dispatcher: GenerationDispatcher,
        per_page: u32,
    ) -> Self {
        Self {
            search,
            dispatcher,
            per_page: if per_page == 0 { DEFAULT_PER_PAGE } else { per_page },
        }
    }

    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        if config.pexels.api_key.is_none() {
            warn!("PEXELS_API_KEY not set; searches will report a configuration error");
        }

        let search = Box::new(PexelsSearchClient::new_with_client(
            config.pexels.clone(),
            http_client.clone(),
        ));
        let dispatcher = GenerationDispatcher::from_config(config, http_client);

        Self::with_services(search, dispatcher, config.per_page)
    }

    /// Construct a gateway from environment configuration (`Config::from_env`).
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub async fn search_page(&self, q: &str, page: Option<&str>) -> SearchPage {
        let query = q.trim().to_string();
        let page = parse_page(page);

        let (images, error_message, has_next) = if query.is_empty() {
            (Vec::new(), None, false)
        } else {
            info!("Search '{}' page {}", query, page);
            match self.search.search(&query, page, self.per_page).await {
                Ok(result) => (result.hits, None, result.has_next),
                Err(failure) => {
                    warn!("Search failed: {}", failure);
                    (Vec::new(), Some(failure.message), false)
                }
            }
        };

        SearchPage {
            query,
            images,
            error_message,
            page,
            has_next,
            has_prev: page > 1,
            next_page: page.saturating_add(1),
            prev_page: page - 1,
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        self.dispatcher.dispatch(request).await
    }

    pub async fn studio(
        &self,
        prompt: &str,
        provider: Option<&str>,
        style: Option<&str>,
    ) -> StudioPage {
        let request = GenerationRequest {
            prompt: prompt.trim().to_string(),
            provider: provider.map(str::to_string),
            style: style.map(str::to_string),
        };

        let (generated_image_data, error_message) = match self.generate(&request).await {
            GenerationResult::Success { image_data_uri } => (Some(image_data_uri), None),
            GenerationResult::Failure { message } => {
                warn!("Generation failed: {}", message);
                (None, Some(message))
            }
        };

        StudioPage {
            prompt: request.prompt,
            generated_image_data,
            error_message,
        }
    }
}
