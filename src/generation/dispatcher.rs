use super::{
    GeminiImageClient, ImageGenerationService, InferenceImageClient, OpenAiImageClient,
};
use crate::models::{Config, GenerationRequest, GenerationResult, ProviderKind};
use std::collections::HashMap;
use tracing::{info, warn};

/// Routes a generation request to exactly one registered provider.
///
/// Unknown or absent provider names fall back to `default_provider`. There is
/// no fan-out and no retry on another provider after a failure.
pub struct GenerationDispatcher {
    providers: HashMap<ProviderKind, Box<dyn ImageGenerationService>>,
    default_provider: ProviderKind,
}

impl GenerationDispatcher {
    pub fn new(default_provider: ProviderKind) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
        }
    }

    /// Register every known provider from configuration, sharing one HTTP pool.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        info!("Default image provider: {}", config.default_provider);

        Self::new(config.default_provider)
            .with_provider(Box::new(GeminiImageClient::new_with_client(
                config.gemini.clone(),
                http_client.clone(),
            )))
            .with_provider(Box::new(InferenceImageClient::new_with_client(
                config.inference.clone(),
                http_client.clone(),
            )))
            .with_provider(Box::new(OpenAiImageClient::new_with_client(
                config.openai.clone(),
                config.openai_model.clone(),
                http_client,
            )))
    }

    /// Register `service` under its own [`ProviderKind`], replacing any previous one.
    pub fn with_provider(mut self, service: Box<dyn ImageGenerationService>) -> Self {
        self.register(service);
        self
    }

    pub fn register(&mut self, service: Box<dyn ImageGenerationService>) {
        self.providers.insert(service.kind(), service);
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Resolve a caller-supplied name to the provider that will run.
    pub fn resolve(&self, name: Option<&str>) -> ProviderKind {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        match name.map(|n| (n, ProviderKind::parse(n))) {
            Some((_, Some(kind))) if self.providers.contains_key(&kind) => kind,
            Some((n, Some(kind))) => {
                warn!(
                    "Provider '{}' ({}) is not registered; using {}",
                    n, kind, self.default_provider
                );
                self.default_provider
            }
            Some((n, None)) => {
                warn!("Unknown provider '{}'; using {}", n, self.default_provider);
                self.default_provider
            }
            None => self.default_provider,
        }
    }

    pub async fn dispatch(&self, request: &GenerationRequest) -> GenerationResult {
        if let Err(e) = request.validate() {
            return GenerationResult::failure(e.to_string());
        }

        let kind = self.resolve(request.provider.as_deref());
        let Some(service) = self.providers.get(&kind) else {
            warn!("No client registered for default provider {}", kind);
            return GenerationResult::failure("no image provider configured");
        };

        info!("Dispatching generation to {}", kind);
        service.generate(&request.effective_prompt()).await
    }
}
