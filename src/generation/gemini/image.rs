use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::generation::client::{Auth, ProviderHttpClient, GENERATION_TIMEOUT};
use crate::generation::{mime, validate_prompt, ImageGenerationService};
use crate::models::{GenerationResult, ProviderConfig, ProviderKind};
use crate::{Error, Result};
use async_trait::async_trait;

const LABEL: &str = "gemini";

/// Gemini `generateContent` image client. The key travels as `?key=`.
pub struct GeminiImageClient {
    http: ProviderHttpClient,
    config: ProviderConfig,
}

impl GeminiImageClient {
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

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        };

        let raw = self
            .http
            .post_json("Gemini", endpoint, Auth::QueryKey(api_key), &request)
            .await?;

        let response: GenerateContentResponse = serde_json::from_slice(&raw.body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            Error::Parse("provider returned an unreadable response".to_string())
        })?;

        let image_data = response.first_inline_data().ok_or_else(|| {
            tracing::warn!("Gemini response contained no inline image");
            Error::Parse("provider responded but no image was found".to_string())
        })?;

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image_data.mime_type.as_deref().unwrap_or("unknown")
        );

        mime::usable_base64(&image_data.data)
            .map(str::to_string)
            .ok_or_else(|| Error::Parse("provider returned an invalid image payload".to_string()))
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(&self, prompt: &str) -> GenerationResult {
        self.generate_payload(prompt)
            .await
            .map(|payload| mime::png_data_uri(&payload))
            .into()
    }
}
