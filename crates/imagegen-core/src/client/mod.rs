//! Generation clients
//!
//! This module provides:
//! - The `GenerationClient` trait adapters call through
//! - Chat completion types, including both image entry shapes
//! - An OpenAI-compatible HTTP implementation (OpenRouter by default)

mod http;
mod traits;
mod types;

pub use http::{HttpGenerationClient, HttpGenerationClientBuilder, OPENROUTER_BASE_URL};
pub use traits::{GenerationClient, LLM_INTEGRATION};
pub use types::{
    CallParams, ChatChoice, ChatCompletion, ChatMessage, ContentPart, ImagePart, ImageUrl,
    MessageContent, MessageImage,
};
