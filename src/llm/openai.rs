//! OpenAI-compatible LLM provider implementation.
//!
//! Works with OpenAI and any other service implementing the OpenAI chat
//! completions API.

use super::provider::{CompletionOptions, LlmError, LlmProvider};
use super::types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible LLM provider.
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAIProvider {
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1").
    /// * `model` - Model to use (e.g., "gpt-4", "gpt-4o-mini").
    /// * `api_key` - Optional API key, sent as a bearer token.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    fn to_openai_messages(messages: &[Message]) -> Vec<OpenAIMessage> {
        messages.iter().map(|m| m.into()).collect()
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = OpenAIChatRequest {
            model: self.model.clone(),
            messages: Self::to_openai_messages(messages),
            temperature: Some(options.temperature),
            max_tokens: options.max_tokens,
        };

        debug!(
            model = %self.model,
            message_count = messages.len(),
            "Sending completion request to OpenAI-compatible API"
        );

        let response = self
            .authorized(self.client.post(&url).json(&request))
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

        let openai_response: OpenAIChatResponse = response.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("No choices in OpenAI response".to_string())
        })?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::MaxTokens,
            Some("content_filter") => FinishReason::Error,
            _ => FinishReason::Stop,
        };

        let usage = openai_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        debug!(
            finish_reason = ?finish_reason,
            "Received completion response from OpenAI-compatible API"
        );

        Ok(CompletionResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            finish_reason,
            usage,
        })
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        let role = match msg.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        OpenAIMessage {
            role: role.to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
