//! LLM provider abstraction layer.
//!
//! A trait-based abstraction over chat completion backends, used by the
//! LLM-backed emotion analyzers.

mod anthropic;
mod openai;
mod provider;
mod types;

pub use anthropic::{AnthropicProvider, DEFAULT_ANTHROPIC_BASE_URL};
pub use openai::{OpenAIProvider, DEFAULT_OPENAI_BASE_URL};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
