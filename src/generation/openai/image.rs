use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::generation::client::{Auth, ProviderHttpClient, GENERATION_TIMEOUT};
use crate::generation::{mime, validate_prompt, ImageGenerationService};
use crate::models::{GenerationResult, ProviderConfig, ProviderKind};
use crate::{Error, Result};
use async_trait::async_trait;

const LABEL: &str = "openai";

pub struct OpenAiImageClient {
    http: ProviderHttpClient,
    config: ProviderConfig,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(config: ProviderConfig, model: String) -> Self {
        Self::new_with_client(config, model, reqwest::Client::new())
    }

    pub fn new_with_client(config: ProviderConfig, model: String, client: reqwest::Client) -> Self {
        Self {
            http: ProviderHttpClient::new_with_client(client, GENERATION_TIMEOUT),
            config,
            model,
        }
    }

    async fn generate_payload(&self, prompt: &str) -> Result<String> {
        let prompt = validate_prompt(prompt)?;
        let api_key = self.config.require_api_key(LABEL)?;
        let endpoint = self.config.require_endpoint(LABEL)?;

        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: "1024x1024".to_string(),
        };

        let raw = self
            .http
            .post_json("OpenAI", endpoint, Auth::Bearer(api_key), &request)
            .await?;

        let response: ImageGenerationResponse = serde_json::from_slice(&raw.body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}", e);
            Error::Parse("provider returned an unreadable response".to_string())
        })?;

        let no_image = || Error::Parse("provider responded but no image was found".to_string());
        let image_data = response.data.first().ok_or_else(no_image)?;

        if let Some(b64_json) = &image_data.b64_json {
            mime::usable_base64(b64_json)
                .map(str::to_string)
                .ok_or_else(|| Error::Parse("provider returned an invalid image payload".to_string()))
        } else if let Some(url) = &image_data.url {
            tracing::debug!("OpenAI returned an image URL, fetching it");
            let image = self.http.get("OpenAI", url).await?;
            if image.body.is_empty() {
                return Err(no_image());
            }
            Ok(mime::encode(&image.body))
        } else {
            Err(no_image())
        }
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn generate(&self, prompt: &str) -> GenerationResult {
        self.generate_payload(prompt)
            .await
            .map(|payload| mime::png_data_uri(&payload))
            .into()
    }
}
