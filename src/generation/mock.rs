use super::ImageGenerationService;
use crate::models::{GenerationResult, ProviderKind};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Canned [`ImageGenerationService`] that records the prompts it receives.
pub struct MockImageGenerationClient {
    kind: ProviderKind,
    result: GenerationResult,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerationClient {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            result: GenerationResult::Success {
                image_data_uri: format!("data:image/png;base64,{}", kind.as_str()),
            },
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_result(mut self, result: GenerationResult) -> Self {
        self.result = result;
        self
    }

    /// Shared handle to the recorded prompts, usable after the mock is boxed.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate(&self, prompt: &str) -> GenerationResult {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone()
    }
}
