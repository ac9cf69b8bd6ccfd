use super::remote_error;
use crate::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

const UNREACHABLE: &str = "unable to reach provider";

/// How a provider expects its key.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    Bearer(&'a str),
    QueryKey(&'a str),
}

/// A successful provider response, kept raw so callers can probe its shape.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Media type without parameters, lowercased.
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    pub fn is_declared_json(&self) -> bool {
        self.media_type()
            .is_some_and(|mt| mt == "application/json" || mt.ends_with("+json"))
    }

    pub fn json_value(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Shared REST plumbing for generation providers: one attempt, bounded by a
/// per-request timeout, with status codes mapped to user-facing errors.
pub struct ProviderHttpClient {
    pub(crate) client: Client,
    timeout: Duration,
}

impl ProviderHttpClient {
    pub fn new_with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn post_json<Req: Serialize>(
        &self,
        provider: &str,
        url: &str,
        auth: Auth<'_>,
        request: &Req,
    ) -> Result<RawResponse> {
        let builder = self.client.post(url).timeout(self.timeout).json(request);
        let builder = match auth {
            Auth::Bearer(key) => builder.bearer_auth(key),
            Auth::QueryKey(key) => builder.query(&[("key", key)]),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", provider, e);
            Error::transport(UNREACHABLE, e)
        })?;

        self.read(provider, response).await
    }

    /// Plain GET, used to follow image URLs handed back by a provider.
    ///
    /// The URL carries no user credentials, so a failing status is reported
    /// as a provider error rather than through the key-related mapping.
    pub async fn get(&self, provider: &str, url: &str) -> Result<RawResponse> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch {} image URL: {}", provider, e);
                Error::transport(UNREACHABLE, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{} image URL returned status {}", provider, status);
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!("provider error {}: image download failed", status.as_u16()),
            });
        }

        self.read(provider, response).await
    }

    async fn read(&self, provider: &str, response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("{} API error (status {}): {}", provider, status, error_text);
            return Err(remote_error(status.as_u16(), &error_text));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(UNREACHABLE, e))?
            .to_vec();

        tracing::debug!(
            "{} responded with {} bytes ({})",
            provider,
            body.len(),
            content_type.as_deref().unwrap_or("no content type")
        );

        Ok(RawResponse { content_type, body })
    }
}
