//! Hosted text-to-image inference endpoints (Hugging Face style).
//!
//! These answer either with raw image bytes or with JSON carrying a base64
//! field whose name varies by deployment.

use super::client::{Auth, ProviderHttpClient, GENERATION_TIMEOUT};
use super::shape::{decode_first, RAW_OR_JSON_SHAPES};
use super::{mime, validate_prompt, ImageGenerationService};
use crate::models::{GenerationResult, ProviderConfig, ProviderKind};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;

const LABEL: &str = "inference";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

pub struct InferenceImageClient {
    http: ProviderHttpClient,
    config: ProviderConfig,
}

impl InferenceImageClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self {
            http: ProviderHttpClient::new_with_client(client, GENERATION_TIMEOUT),
            config,
        }
    }

    async fn generate_payload(&self, prompt: &str) -> Result<String> {
        let prompt = validate_prompt(prompt)?;
        let api_key = self.config.require_api_key(LABEL)?;
        let endpoint = self.config.require_endpoint(LABEL)?;

        let raw = self
            .http
            .post_json(
                "Inference",
                endpoint,
                Auth::Bearer(api_key),
                &InferenceRequest { inputs: prompt },
            )
            .await?;

        let (shape, payload) = decode_first(&RAW_OR_JSON_SHAPES, &raw).ok_or_else(|| {
            tracing::warn!(
                "Inference response matched no known shape ({})",
                raw.content_type.as_deref().unwrap_or("no content type")
            );
            Error::Parse("unhandled response format".to_string())
        })?;

        tracing::debug!("Inference response decoded as {:?}", shape);
        Ok(payload)
    }
}

#[async_trait]
impl ImageGenerationService for InferenceImageClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Inference
    }

    async fn generate(&self, prompt: &str) -> GenerationResult {
        self.generate_payload(prompt)
            .await
            .map(|payload| mime::png_data_uri(&payload))
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/stabilityai/stable-diffusion-xl-base-1.0";

    fn make_client(server: &MockServer) -> InferenceImageClient {
        InferenceImageClient::new(ProviderConfig::new(
            Some("hf-key".to_string()),
            Some(format!("{}{}", server.uri(), MODEL_PATH)),
        ))
    }

    fn expected_success() -> GenerationResult {
        GenerationResult::Success {
            image_data_uri: "data:image/png;base64,Zm9v".to_string(),
        }
    }

    #[tokio::test]
    async fn test_raw_bytes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("Authorization", "Bearer hf-key"))
            .and(body_json(serde_json::json!({ "inputs": "a lighthouse" })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"foo".to_vec(), "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(client.generate("a lighthouse").await, expected_success());
    }

    #[tokio::test]
    async fn test_raw_bytes_without_image_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"foo".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(client.generate("a lighthouse").await, expected_success());
    }

    #[tokio::test]
    async fn test_json_field_responses() {
        for key in ["image_base64", "image", "data"] {
            let mut body = serde_json::Map::new();
            body.insert(key.to_string(), serde_json::Value::from("Zm9v"));

            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;

            let client = make_client(&server);
            assert_eq!(client.generate("a lighthouse").await, expected_success(), "key {}", key);
        }
    }

    #[tokio::test]
    async fn test_unknown_format_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "images": ["Zm9v"], "status": "ok" })),
            )
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(
            client.generate("a lighthouse").await,
            GenerationResult::failure("unhandled response format")
        );
    }

    #[tokio::test]
    async fn test_model_loading_error_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model is currently loading",
                "estimated_time": 20.0
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(
            client.generate("a lighthouse").await.error_message(),
            Some("provider error 503: Model is currently loading")
        );
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(
            client.generate("a lighthouse").await.error_message(),
            Some("rate limited, try later")
        );
    }

    #[tokio::test]
    async fn test_missing_endpoint_fails_without_request() {
        let client = InferenceImageClient::new(ProviderConfig::new(Some("hf-key".to_string()), None));
        assert_eq!(
            client.generate("a lighthouse").await.error_message(),
            Some("inference endpoint not configured")
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let client = InferenceImageClient::new(ProviderConfig::new(
            Some("hf-key".to_string()),
            Some("http://127.0.0.1:1/models/x".to_string()),
        ));
        assert_eq!(
            client.generate("a lighthouse").await.error_message(),
            Some("unable to reach provider")
        );
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(b"foo".to_vec(), "image/png")
                    .set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut client = make_client(&server);
        client.http = client.http.with_timeout(std::time::Duration::from_millis(100));
        assert_eq!(
            client.generate("a lighthouse").await.error_message(),
            Some("unable to reach provider")
        );
    }
}
