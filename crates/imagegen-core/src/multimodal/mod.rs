//! Multimodal response model
//!
//! A unified result combining optional text with zero or more images, and
//! the detection routine that adapts provider payloads into it.

mod detect;
mod types;

pub use detect::detect_multimodal_response;
pub use types::{ImageDescriptor, MultimodalResult};
