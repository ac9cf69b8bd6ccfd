//! Image generation providers
//!
//! Every provider implements [`ImageGenerationService`] and answers with a
//! [`GenerationResult`]; the [`GenerationDispatcher`] routes a request to
//! exactly one of them.

pub mod client;
pub mod dispatcher;
pub mod gemini;
pub mod inference;
pub mod mime;
pub mod mock;
pub mod openai;
pub mod shape;

pub use dispatcher::GenerationDispatcher;
pub use gemini::GeminiImageClient;
pub use inference::InferenceImageClient;
pub use mock::MockImageGenerationClient;
pub use openai::OpenAiImageClient;

use crate::models::{GenerationResult, ProviderKind};
use crate::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Render `prompt` into an image. Never panics or errors; failures are data.
    async fn generate(&self, prompt: &str) -> GenerationResult;
}

const MAX_DETAIL_LEN: usize = 200;

pub(crate) fn validate_prompt(prompt: &str) -> Result<&str> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(Error::Validation("please enter a prompt".to_string()));
    }
    Ok(prompt)
}

/// Map a non-success provider status to its user-facing error.
pub fn remote_error(status: u16, body: &str) -> Error {
    let message = match status {
        401 => "invalid API key".to_string(),
        402 => "payment/credits required".to_string(),
        429 => "rate limited, try later".to_string(),
        _ => match error_detail(body) {
            Some(detail) => format!("provider error {}: {}", status, detail),
            None => format!("provider error {}", status),
        },
    };
    Error::Remote { status, message }
}

/// Best-effort human-readable detail from an error body.
///
/// Recognizes `{"error": {"message": ..}}`, `{"error": ".."}`, `{"message": ..}`
/// and `{"detail": ..}`; anything else falls back to the trimmed raw text.
pub fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            let text = |v: Option<&serde_json::Value>| {
                v.and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            let error = json.get("error");
            text(error.and_then(|e| e.get("message")))
                .or_else(|| text(error))
                .or_else(|| text(json.get("message")))
                .or_else(|| text(json.get("detail")))
        });

    let detail = from_json.unwrap_or_else(|| body.to_string());
    Some(detail.chars().take(MAX_DETAIL_LEN).collect())
}
