//! Direct-provider image generation
//!
//! Calls the client's dedicated image-generation capability and runs the
//! provider-native payload through the shared detector.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::client::{CallParams, GenerationClient};
use crate::error::Result;
use crate::multimodal::{MultimodalResult, detect_multimodal_response};

use super::request::{GenerationRequest, merge_params};
use super::resolve_client;

/// Adapter for the generic image-generation capability
#[derive(Clone, Default)]
pub struct DirectProviderAdapter {
    client: Option<Arc<dyn GenerationClient>>,
}

impl std::fmt::Debug for DirectProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectProviderAdapter")
            .field("client", &self.client.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl DirectProviderAdapter {
    /// Create an adapter backed by `client`
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Create an adapter from a slot that may be empty
    pub fn from_slot(client: Option<Arc<dyn GenerationClient>>) -> Self {
        Self { client }
    }

    /// Adapter with no client registered
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Generate images for `request`
    pub async fn generate(&self, request: &GenerationRequest) -> Result<MultimodalResult> {
        let client = resolve_client(&self.client)?;
        request.validate()?;

        info!(
            model = %request.model,
            size = %request.size,
            quality = %request.quality,
            "Generating image"
        );

        let params = build_params(request);
        debug!(params = params.len(), "Calling image generation");

        let response = client.image_generation(params).await.inspect_err(|e| {
            debug!(model = %request.model, error = %e, "Image generation call failed");
        })?;

        let result = detect_multimodal_response(&response);

        info!(
            model = %request.model,
            images = result.images.len(),
            "Image generation completed"
        );

        Ok(result)
    }
}

/// Parameter set for the image-generation call
///
/// `style` is present only when the request sets one.
pub(crate) fn build_params(request: &GenerationRequest) -> CallParams {
    let mut fixed = CallParams::new();
    fixed.insert("prompt".to_string(), json!(request.prompt));
    fixed.insert("model".to_string(), json!(request.model));
    fixed.insert("size".to_string(), json!(request.size));
    fixed.insert("quality".to_string(), json!(request.quality));
    if let Some(style) = &request.style {
        fixed.insert("style".to_string(), Value::String(style.clone()));
    }
    fixed.insert(
        "response_format".to_string(),
        json!(request.response_format.as_str()),
    );

    merge_params(fixed, &request.extra)
}

/// Generate images through the direct provider
///
/// Fails with an integration-unavailable error when `client` is `None`.
pub async fn generate_image_llm(
    client: Option<Arc<dyn GenerationClient>>,
    request: &GenerationRequest,
) -> Result<MultimodalResult> {
    DirectProviderAdapter::from_slot(client).generate(request).await
}
