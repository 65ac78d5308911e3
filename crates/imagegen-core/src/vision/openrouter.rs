//! OpenRouter image generation
//!
//! Uses the chat completions endpoint with `modalities: ["text", "image"]`
//! and reads images out of the first choice's message.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::{CallParams, ChatCompletion, GenerationClient};
use crate::error::Result;
use crate::multimodal::{ImageDescriptor, MultimodalResult};

use super::request::{GenerationRequest, merge_params};
use super::resolve_client;

/// Output modalities requested from the completion
pub const OUTPUT_MODALITIES: [&str; 2] = ["text", "image"];

/// Adapter for image output through chat completions
#[derive(Clone, Default)]
pub struct OpenRouterAdapter {
    client: Option<Arc<dyn GenerationClient>>,
}

impl std::fmt::Debug for OpenRouterAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterAdapter")
            .field("client", &self.client.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl OpenRouterAdapter {
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

        info!(model = %request.model, "Generating image via OpenRouter");

        let params = build_params(request);
        debug!(params = params.len(), "Calling chat completion with image modality");

        let completion = client.chat_completion(params).await.inspect_err(|e| {
            debug!(model = %request.model, error = %e, "OpenRouter completion failed");
        })?;

        let result = normalize_chat_completion(&completion);

        info!(
            model = %request.model,
            images = result.images.len(),
            "OpenRouter image generation completed"
        );

        Ok(result)
    }
}

/// Parameter set for the chat-completion call
///
/// Size, quality, style and response format have no chat-completion
/// equivalent; provider knobs such as `image_config` travel in the extras.
pub(crate) fn build_params(request: &GenerationRequest) -> CallParams {
    let mut fixed = CallParams::new();
    fixed.insert("model".to_string(), json!(request.model));
    fixed.insert(
        "messages".to_string(),
        json!([{ "role": "user", "content": request.prompt }]),
    );
    fixed.insert("modalities".to_string(), json!(OUTPUT_MODALITIES));

    merge_params(fixed, &request.extra)
}

/// Turn a chat completion into a multimodal result
///
/// Reads only the first choice. A missing choice or missing images yield an
/// empty image list, never an error. Content given as parts contributes the
/// text of its text parts.
pub fn normalize_chat_completion(completion: &ChatCompletion) -> MultimodalResult {
    let Some(message) = completion.first_message() else {
        return MultimodalResult::default();
    };

    let images = message
        .images
        .iter()
        .flatten()
        .enumerate()
        .filter_map(|(index, image)| match image.url() {
            Some(url) => Some(ImageDescriptor::from_url(url)),
            None => {
                warn!(index, "Skipping message image without a URL");
                None
            }
        })
        .collect();

    MultimodalResult::new(message.text(), images)
}

/// Generate images through OpenRouter
///
/// Fails with an integration-unavailable error when `client` is `None`.
pub async fn generate_image_openrouter(
    client: Option<Arc<dyn GenerationClient>>,
    request: &GenerationRequest,
) -> Result<MultimodalResult> {
    OpenRouterAdapter::from_slot(client).generate(request).await
}
