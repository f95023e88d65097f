//! LLM provider trait definition.

use super::types::{CompletionResponse, Message};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

impl LlmError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Connection(e.to_string())
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations connect to different chat completion backends
/// (OpenAI-compatible, Anthropic) behind one interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider's name (e.g., "openai", "anthropic").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Complete a conversation.
    ///
    /// # Arguments
    /// * `messages` - The conversation, system prompt first.
    /// * `options` - Completion options (temperature, timeout, etc.).
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;
}
