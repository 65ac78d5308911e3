//! Image generation adapters
//!
//! Two paths produce the same `MultimodalResult`:
//! - `DirectProviderAdapter`: the client's dedicated image-generation call
//! - `OpenRouterAdapter`: a chat completion asked for image output
//!
//! Neither adapter retries, caches or rewrites errors from the client.

mod direct;
mod openrouter;
mod request;

use std::sync::Arc;

pub use direct::{DirectProviderAdapter, generate_image_llm};
pub use openrouter::{
    OUTPUT_MODALITIES, OpenRouterAdapter, generate_image_openrouter, normalize_chat_completion,
};
pub use request::{GenerationRequest, ResponseFormat};

use crate::client::{GenerationClient, LLM_INTEGRATION};
use crate::error::{Error, Result};

/// Resolve the registered client or report the integration as missing
fn resolve_client(
    slot: &Option<Arc<dyn GenerationClient>>,
) -> Result<&Arc<dyn GenerationClient>> {
    slot.as_ref().ok_or_else(|| Error::not_installed(LLM_INTEGRATION))
}
