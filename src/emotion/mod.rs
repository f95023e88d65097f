//! Text to emotion classification.
//!
//! [`EmotionAnalyzer`] never fails: every backend resolves blank input,
//! unrecognized output and internal errors to [`DEFAULT_EMOTION`].

mod llm_backed;
mod rule_based;

pub use llm_backed::{LlmEmotionAnalyzer, SYSTEM_PROMPT};
pub use rule_based::RuleBasedAnalyzer;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AnalyzerSettings;
use crate::llm::{AnthropicProvider, LlmProvider, OpenAIProvider};
use crate::scene::Emotion;

pub const DEFAULT_EMOTION: Emotion = Emotion::Calm;

#[async_trait]
pub trait EmotionAnalyzer: Send + Sync {
    /// Short backend name, for logs and the status endpoint.
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> Emotion;
}

/// Which analyzer implementation to run, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerBackend {
    #[default]
    RuleBased,
    OpenAi,
    Claude,
}

impl AnalyzerBackend {
    /// Parses a configured backend name. Unrecognized names fall back to
    /// [`AnalyzerBackend::RuleBased`].
    pub fn from_config(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return AnalyzerBackend::RuleBased;
        };
        match value.trim().to_lowercase().as_str() {
            "rule_based" | "rulebased" | "rule-based" | "rules" => AnalyzerBackend::RuleBased,
            "openai" | "open_ai" => AnalyzerBackend::OpenAi,
            "claude" | "anthropic" => AnalyzerBackend::Claude,
            other => {
                warn!(backend = %other, "Unknown analyzer backend, using rule_based");
                AnalyzerBackend::RuleBased
            }
        }
    }
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalyzerBackend::RuleBased => "rule_based",
            AnalyzerBackend::OpenAi => "openai",
            AnalyzerBackend::Claude => "claude",
        };
        f.write_str(name)
    }
}

/// Builds the analyzer selected by `settings`.
///
/// An LLM backend without an API key cannot work, so it is replaced by the
/// rule based analyzer.
pub fn build_analyzer(settings: &AnalyzerSettings) -> Arc<dyn EmotionAnalyzer> {
    let timeout = Duration::from_secs(settings.timeout_sec);

    let provider: Arc<dyn LlmProvider> = match settings.backend {
        AnalyzerBackend::RuleBased => {
            info!("Using rule based emotion analyzer");
            return Arc::new(RuleBasedAnalyzer::new());
        }
        AnalyzerBackend::OpenAi => match &settings.openai.api_key {
            Some(key) => Arc::new(OpenAIProvider::new(
                settings.openai.base_url.clone(),
                settings.openai.model.clone(),
                Some(key.clone()),
            )),
            None => {
                warn!("OpenAI analyzer selected without an api key, using rule_based");
                return Arc::new(RuleBasedAnalyzer::new());
            }
        },
        AnalyzerBackend::Claude => match &settings.claude.api_key {
            Some(key) => Arc::new(AnthropicProvider::new(
                settings.claude.base_url.clone(),
                settings.claude.model.clone(),
                key.clone(),
            )),
            None => {
                warn!("Claude analyzer selected without an api key, using rule_based");
                return Arc::new(RuleBasedAnalyzer::new());
            }
        },
    };

    info!(
        provider = %provider.name(),
        model = %provider.model(),
        "Using LLM emotion analyzer"
    );
    Arc::new(LlmEmotionAnalyzer::new(provider, timeout))
}
