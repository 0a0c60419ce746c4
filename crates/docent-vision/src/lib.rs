//! Vision provider layer for docent.
//!
//! This crate provides a unified interface for asking hosted vision-capable
//! models to read a document image:
//! - OpenAI-style chat completions with a multimodal user message
//! - Gemini `generateContent` with inline image data
//!
//! Prompt text comes from `docent-core`; the raw answer goes back to
//! `docent_core::normalize`.

mod backend;
mod error;
mod payload;

pub use backend::{create_provider, ClientOptions, Provider, VisionProvider};
pub use error::VisionError;
pub use payload::{ImagePayload, VisionRequest};

#[cfg(feature = "openai")]
pub use backend::openai::OpenAiVision;

#[cfg(feature = "gemini")]
pub use backend::gemini::GeminiVision;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, VisionError>;
