//! Pluggable generation client interface

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

use super::types::{CallParams, ChatCompletion};

/// Name reported when no generation client has been registered
pub const LLM_INTEGRATION: &str = "llm";

/// A backend capable of generating images
///
/// Implementations are supplied by the host environment. Adapters treat them
/// as read-only and call exactly one method per generation request.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Integration name, used in diagnostics
    fn name(&self) -> &str {
        LLM_INTEGRATION
    }

    /// Dedicated image-generation call
    ///
    /// Returns the provider-native payload untouched.
    async fn image_generation(&self, params: CallParams) -> Result<Value>;

    /// Chat completion call
    async fn chat_completion(&self, params: CallParams) -> Result<ChatCompletion>;
}
