use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{EmotionAnalyzer, DEFAULT_EMOTION};
use crate::llm::{CompletionOptions, LlmProvider, Message};
use crate::scene::Emotion;

pub const SYSTEM_PROMPT: &str = "You are an emotion analyzer. Analyze the given text and respond with ONLY ONE of these emotions: Calm, Stressed, Upbeat, Low.

- Calm: neutral, peaceful, or balanced emotional state
- Stressed: anxious, overwhelmed, tense, or irritated
- Upbeat: happy, excited, energetic, or motivated
- Low: tired, sad, depleted, or down

Respond with only the emotion name, nothing else.";

/// A single label needs only a couple of tokens.
const MAX_LABEL_TOKENS: u32 = 10;

/// Emotion analyzer backed by a chat completion provider.
///
/// The provider is asked for exactly one label. Anything that is not a
/// label, and any provider failure, yields [`DEFAULT_EMOTION`].
pub struct LlmEmotionAnalyzer {
    provider: Arc<dyn LlmProvider>,
    options: CompletionOptions,
}

impl LlmEmotionAnalyzer {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                temperature: 0.3,
                max_tokens: Some(MAX_LABEL_TOKENS),
                timeout,
            },
        }
    }
}

#[async_trait]
impl EmotionAnalyzer for LlmEmotionAnalyzer {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn analyze(&self, text: &str) -> Emotion {
        if text.trim().is_empty() {
            return DEFAULT_EMOTION;
        }

        debug!(provider = %self.provider.name(), text = %text, "Analyzing emotion");

        let messages = [Message::system(SYSTEM_PROMPT), Message::user(text)];
        let response = match self.provider.complete(&messages, &self.options).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    provider = %self.provider.name(),
                    model = %self.provider.model(),
                    error = %e,
                    "Emotion analysis failed, defaulting to {}",
                    DEFAULT_EMOTION
                );
                return DEFAULT_EMOTION;
            }
        };

        debug!(
            provider = %self.provider.name(),
            finish_reason = ?response.finish_reason,
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "Completion received"
        );

        let label = response.message.content.trim();
        match label.parse::<Emotion>() {
            Ok(emotion) => {
                info!(provider = %self.provider.name(), emotion = %emotion, "Emotion detected");
                emotion
            }
            Err(_) => {
                warn!(
                    provider = %self.provider.name(),
                    response = %label,
                    "Could not parse emotion label, defaulting to {}",
                    DEFAULT_EMOTION
                );
                DEFAULT_EMOTION
            }
        }
    }
}
