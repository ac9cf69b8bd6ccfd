use super::types::{PexelsPhoto, PexelsSearchResponse};
use super::SearchService;
use crate::models::{Failure, ImageHit, ProviderConfig, SearchOutcome, SearchResult};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Pexels `/v1/search` client. Authenticates with the raw key in `Authorization`.
pub struct PexelsSearchClient {
    client: Client,
    config: ProviderConfig,
    timeout: Duration,
}

impl PexelsSearchClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: ProviderConfig, client: Client) -> Self {
        Self {
            client,
            config,
            timeout: SEARCH_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_page(&self, query: &str, page: u32, per_page: u32) -> Result<SearchResult> {
        let api_key = self.config.require_api_key("search")?;
        let endpoint = self.config.require_endpoint("search")?;

        tracing::debug!("Searching Pexels for '{}' (page {}, per_page {})", query, page, per_page);

        let response = self
            .client
            .get(endpoint)
            .timeout(self.timeout)
            .header("Authorization", api_key)
            .query(&[
                ("query", query.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Pexels: {}", e);
                Error::transport("unable to connect", e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!("Pexels API error (status {})", status);
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!("search API error (status {})", status.as_u16()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport("unable to connect", e))?;
        let parsed: PexelsSearchResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Pexels response: {}", e);
            Error::Parse("search API returned an unreadable response".to_string())
        })?;

        let hits: Vec<ImageHit> = parsed
            .photos
            .unwrap_or_default()
            .into_iter()
            .map(to_hit)
            .collect();

        tracing::debug!("Pexels returned {} photos", hits.len());
        Ok(SearchResult::from_hits(hits, page, per_page))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn to_hit(photo: PexelsPhoto) -> ImageHit {
    let src = photo.src.unwrap_or_default();
    ImageHit {
        thumb_url: present(src.medium).or_else(|| present(src.small)),
        full_url: present(src.original).or_else(|| present(src.large)),
        photographer: photo.photographer,
        photographer_url: photo.photographer_url,
        page_url: photo.url,
    }
}

#[async_trait]
impl SearchService for PexelsSearchClient {
    async fn search(&self, query: &str, page: u32, per_page: u32) -> SearchOutcome {
        let page = page.max(1);
        if query.trim().is_empty() {
            return Ok(SearchResult::empty(page));
        }

        self.fetch_page(query.trim(), page, per_page)
            .await
            .map_err(Failure::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/v1/search";

    fn make_client(server: &MockServer, api_key: Option<&str>) -> PexelsSearchClient {
        PexelsSearchClient::new(ProviderConfig::new(
            api_key.map(str::to_string),
            Some(format!("{}{}", server.uri(), SEARCH_PATH)),
        ))
    }

    fn photo(n: usize) -> serde_json::Value {
        serde_json::json!({
            "url": format!("https://www.pexels.com/photo/{}", n),
            "photographer": format!("Artist {}", n),
            "photographer_url": format!("https://www.pexels.com/@artist{}", n),
            "src": {
                "original": format!("https://images.pexels.com/{}/original.jpg", n),
                "large": format!("https://images.pexels.com/{}/large.jpg", n),
                "medium": format!("https://images.pexels.com/{}/medium.jpg", n),
                "small": format!("https://images.pexels.com/{}/small.jpg", n)
            }
        })
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let result = client.search("   ", 3, 24).await.unwrap();

        assert!(result.hits.is_empty());
        assert_eq!(result.page, 3);
        assert!(!result.has_next);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server, None);
        let failure = client.search("cats", 1, 24).await.unwrap_err();
        assert_eq!(failure.message, "search API key not configured");
    }

    #[tokio::test]
    async fn test_sends_query_and_raw_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("query", "mountain lake"))
            .and(query_param("per_page", "2"))
            .and(query_param("page", "1"))
            .and(header("Authorization", "raw-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": [photo(1), photo(2)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, Some("raw-key"));
        let result = client.search(" mountain lake ", 1, 2).await.unwrap();

        assert_eq!(result.hits.len(), 2);
        assert_eq!(
            result.hits[0],
            ImageHit {
                thumb_url: Some("https://images.pexels.com/1/medium.jpg".to_string()),
                full_url: Some("https://images.pexels.com/1/original.jpg".to_string()),
                photographer: Some("Artist 1".to_string()),
                photographer_url: Some("https://www.pexels.com/@artist1".to_string()),
                page_url: Some("https://www.pexels.com/photo/1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_full_page_sets_has_next() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": [photo(1), photo(2), photo(3)]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));

        let first = client.search("cats", 1, 3).await.unwrap();
        assert!(first.has_next);
        assert!(!first.has_prev);

        let second = client.search("cats", 2, 3).await.unwrap();
        assert!(second.has_prev);

        let short = client.search("cats", 1, 4).await.unwrap();
        assert!(!short.has_next);
    }

    #[tokio::test]
    async fn test_size_fallbacks_and_missing_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": [
                    { "src": { "small": "s.jpg", "large": "l.jpg", "medium": "" } },
                    { "photographer": "Only Name" }
                ]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let result = client.search("cats", 1, 24).await.unwrap();

        assert_eq!(result.hits[0].thumb_url.as_deref(), Some("s.jpg"));
        assert_eq!(result.hits[0].full_url.as_deref(), Some("l.jpg"));
        assert_eq!(result.hits[0].photographer, None);
        assert_eq!(
            result.hits[1],
            ImageHit {
                photographer: Some("Only Name".to_string()),
                ..ImageHit::default()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_record_keeps_rest_of_page() {
        let server = MockServer::start().await;
        let mut broken = photo(2);
        broken["url"] = serde_json::json!(5);
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": [photo(1), broken, photo(3)]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let result = client.search("cats", 1, 3).await.unwrap();

        assert_eq!(result.hits.len(), 3);
        assert_eq!(result.hits[1].page_url, None);
        assert_eq!(
            result.hits[1].thumb_url.as_deref(),
            Some("https://images.pexels.com/2/medium.jpg")
        );
        assert!(result.has_next);
    }

    #[tokio::test]
    async fn test_missing_photos_array_is_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_results": 0
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let result = client.search("nothing", 1, 24).await.unwrap();
        assert!(result.hits.is_empty());
        assert!(!result.has_next);
    }

    #[tokio::test]
    async fn test_non_200_maps_to_status_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let failure = client.search("cats", 1, 24).await.unwrap_err();
        assert_eq!(failure.message, "search API error (status 403)");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let failure = client.search("cats", 1, 24).await.unwrap_err();
        assert_eq!(failure.message, "search API returned an unreadable response");
    }

    #[tokio::test]
    async fn test_connection_refused_is_unable_to_connect() {
        let client = PexelsSearchClient::new(ProviderConfig::new(
            Some("key".to_string()),
            Some("http://127.0.0.1:1/v1/search".to_string()),
        ));

        let failure = client.search("cats", 1, 24).await.unwrap_err();
        assert_eq!(failure.message, "unable to connect");
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "photos": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key")).with_timeout(Duration::from_millis(100));
        let failure = client.search("cats", 1, 24).await.unwrap_err();
        assert_eq!(failure.message, "unable to connect");
    }
}
