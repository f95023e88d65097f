//! Anthropic Messages API provider implementation.

use super::provider::{CompletionOptions, LlmError, LlmProvider};
use super::types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires `max_tokens`; used when the caller sets none.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic (Claude) provider.
///
/// System messages are lifted into the top-level `system` field; the
/// remaining messages are sent in order.
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl AnthropicProvider {
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.anthropic.com").
    /// * `model` - Model to use (e.g., "claude-3-5-haiku-latest").
    /// * `api_key` - Key sent in the `x-api-key` header.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn build_request(&self, messages: &[Message], options: &CompletionOptions) -> AnthropicRequest {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();

        let turns = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    MessageRole::Assistant => "assistant",
                    _ => "user",
                },
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: if system.is_empty() {
                None
            } else {
                Some(system.join("\n\n"))
            },
            messages: turns,
            temperature: Some(options.temperature),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = self.build_request(messages, options);

        debug!(
            model = %self.model,
            message_count = messages.len(),
            "Sending completion request to Anthropic"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(LlmError::from_reqwest)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let anthropic_response: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let text = anthropic_response
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| {
                LlmError::InvalidResponse("No text block in Anthropic response".to_string())
            })?;

        let finish_reason = match anthropic_response.stop_reason.as_deref() {
            Some("max_tokens") => FinishReason::MaxTokens,
            _ => FinishReason::Stop,
        };

        let usage = anthropic_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        debug!(finish_reason = ?finish_reason, "Received completion response from Anthropic");

        Ok(CompletionResponse {
            message: Message::assistant(text),
            finish_reason,
            usage,
        })
    }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
