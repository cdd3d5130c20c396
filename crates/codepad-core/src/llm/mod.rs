//! Generative-language service abstraction.
//!
//! The assistant only ever sends one prompt and reads one completion back, so
//! the trait is a single-turn text completion.

use crate::errors::CodepadError;
use async_trait::async_trait;

pub mod providers;

pub use providers::gemini::GeminiClient;

#[async_trait]
pub trait LLM: Send + Sync {
    /// Send one prompt and return the model's text completion.
    async fn complete(&self, prompt: &str) -> Result<String, CodepadError>;
}
