//! HTTP generation client for OpenAI-compatible APIs
//!
//! Talks to OpenRouter by default. Image generation goes to
//! `/images/generations`, chat completions to `/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

use super::traits::GenerationClient;
use super::types::{CallParams, ChatCompletion};

/// OpenRouter API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Generation client speaking the OpenAI-compatible HTTP protocol
#[derive(Clone)]
pub struct HttpGenerationClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for HttpGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerationClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for HttpGenerationClient
#[derive(Default)]
pub struct HttpGenerationClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpGenerationClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed base URL and timeout from configuration
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.timeout_secs = Some(config.timeout_secs);
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL (defaults to OpenRouter)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpGenerationClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("API key is required".to_string()))?;

        let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Network)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(HttpGenerationClient {
            http_client,
            api_key,
            base_url,
        })
    }
}

impl HttpGenerationClient {
    /// Create a client for OpenRouter with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        HttpGenerationClientBuilder::new().api_key(api_key).build()
    }

    /// Create a new builder
    pub fn builder() -> HttpGenerationClientBuilder {
        HttpGenerationClientBuilder::new()
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, params: &CallParams) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let model = params
            .get("model")
            .and_then(|model| model.as_str())
            .unwrap_or_default();

        debug!(url = %url, model, "Sending generation request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://github.com/imagegen/imagegen")
            .header("X-Title", "imagegen")
            .json(params)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn image_generation(&self, params: CallParams) -> Result<Value> {
        self.post("images/generations", &params).await
    }

    async fn chat_completion(&self, params: CallParams) -> Result<ChatCompletion> {
        self.post("chat/completions", &params).await
    }
}
