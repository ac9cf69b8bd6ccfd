//! Data models and configuration
//!
//! Defines the normalized search and generation results shared by every
//! provider client, plus the environment-driven configuration surface.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One photo from a stock search, normalized across providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageHit {
    pub thumb_url: Option<String>,
    pub full_url: Option<String>,
    pub photographer: Option<String>,
    pub photographer_url: Option<String>,
    pub page_url: Option<String>,
}

/// A page of search hits plus pagination state.
///
/// `has_next` is a heuristic: the search API exposes no reliable total, so a
/// full page is taken to mean another page probably exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub hits: Vec<ImageHit>,
    pub page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl SearchResult {
    pub fn from_hits(hits: Vec<ImageHit>, page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        let has_next = per_page > 0 && hits.len() == per_page as usize;
        Self {
            hits,
            page,
            has_next,
            has_prev: page > 1,
        }
    }

    pub fn empty(page: u32) -> Self {
        let page = page.max(1);
        Self {
            hits: Vec::new(),
            page,
            has_next: false,
            has_prev: page > 1,
        }
    }
}

/// The single user-facing failure every provider error collapses into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::new(err.to_string())
    }
}

pub type SearchOutcome = std::result::Result<SearchResult, Failure>;

/// A prompt submitted for image generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Provider name as typed by the caller; resolved by the dispatcher.
    pub provider: Option<String>,
    pub style: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::Validation("please enter a prompt".to_string()));
        }
        Ok(())
    }

    /// Prompt text sent to the provider, with the style folded in when set.
    pub fn effective_prompt(&self) -> String {
        let prompt = self.prompt.trim();
        match self.style.as_deref().map(str::trim) {
            Some(style) if !style.is_empty() => crate::prompts::render(
                crate::prompts::STYLED_PROMPT,
                &[("prompt", prompt), ("style", style)],
            )
            .trim()
            .to_string(),
            _ => prompt.to_string(),
        }
    }
}

/// Normalized outcome of a generation call. Exactly one variant, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationResult {
    Success { image_data_uri: String },
    Failure { message: String },
}

impl GenerationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        GenerationResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn image_data_uri(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { image_data_uri } => Some(image_data_uri),
            GenerationResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { .. } => None,
            GenerationResult::Failure { message } => Some(message),
        }
    }
}

impl From<crate::Result<String>> for GenerationResult {
    fn from(result: crate::Result<String>) -> Self {
        match result {
            Ok(image_data_uri) => GenerationResult::Success { image_data_uri },
            Err(e) => GenerationResult::failure(e.to_string()),
        }
    }
}

/// Supported image-generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Inference,
    OpenAi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Gemini,
        ProviderKind::Inference,
        ProviderKind::OpenAi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Inference => "inference",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Lenient lookup used for caller-supplied names; `None` for unknown.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "inference" | "huggingface" | "hf" => Some(ProviderKind::Inference),
            "openai" | "open-ai" => Some(ProviderKind::OpenAi),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        ProviderKind::parse(s)
            .ok_or_else(|| Error::Configuration(format!("unknown image provider '{}'", s)))
    }
}

/// Credentials and endpoint for one external service. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(api_key: Option<String>, endpoint_url: Option<String>) -> Self {
        Self {
            api_key,
            endpoint_url,
        }
    }

    pub fn require_api_key(&self, label: &str) -> crate::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("{} API key not configured", label)))
    }

    pub fn require_endpoint(&self, label: &str) -> crate::Result<&str> {
        self.endpoint_url
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("{} endpoint not configured", label)))
    }
}

pub const DEFAULT_PEXELS_ENDPOINT: &str = "https://api.pexels.com/v1/search";
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_PER_PAGE: u32 = 24;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub pexels: ProviderConfig,
    pub per_page: u32,
    pub gemini: ProviderConfig,
    pub inference: ProviderConfig,
    pub openai: ProviderConfig,
    pub openai_model: String,
    pub default_provider: ProviderKind,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let per_page = match var("SEARCH_PER_PAGE") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    Error::Configuration(format!("SEARCH_PER_PAGE must be a positive integer, got '{}'", raw))
                })?,
            None => DEFAULT_PER_PAGE,
        };

        let default_provider = match var("DEFAULT_IMAGE_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderKind::Gemini,
        };

        Ok(Self {
            pexels: ProviderConfig::new(
                var("PEXELS_API_KEY"),
                Some(var("PEXELS_ENDPOINT").unwrap_or_else(|| DEFAULT_PEXELS_ENDPOINT.to_string())),
            ),
            per_page,
            gemini: ProviderConfig::new(
                var("GEMINI_API_KEY"),
                Some(var("GEMINI_ENDPOINT").unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string())),
            ),
            inference: ProviderConfig::new(var("INFERENCE_API_KEY"), var("INFERENCE_ENDPOINT")),
            openai: ProviderConfig::new(
                var("OPENAI_API_KEY"),
                Some(var("OPENAI_ENDPOINT").unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string())),
            ),
            openai_model: var("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_IMAGE_MODEL.to_string()),
            default_provider,
        })
    }
}
