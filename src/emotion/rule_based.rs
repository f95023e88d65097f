use async_trait::async_trait;

use super::{EmotionAnalyzer, DEFAULT_EMOTION};
use crate::scene::Emotion;

/// Keyword sets checked in order; the first set with a hit wins.
const KEYWORD_RULES: [(Emotion, &[&str]); 3] = [
    (
        Emotion::Stressed,
        &[
            "overwhelmed",
            "anxious",
            "stressed",
            "panic",
            "tense",
            "irritated",
            "angry",
        ],
    ),
    (
        Emotion::Low,
        &["tired", "exhausted", "drained", "sad", "down", "low", "hopeless"],
    ),
    (
        Emotion::Upbeat,
        &["happy", "excited", "motivated", "energetic", "joyful", "pumped"],
    ),
];

/// Keyword matcher.
///
/// Matching is plain substring containment on the lowercased text, so
/// "slowly" counts as "low". Stress words take precedence over low words,
/// which take precedence over upbeat words.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(text: &str) -> Emotion {
        if text.trim().is_empty() {
            return DEFAULT_EMOTION;
        }

        let text = text.to_lowercase();
        KEYWORD_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
            .map(|(emotion, _)| *emotion)
            .unwrap_or(DEFAULT_EMOTION)
    }
}

#[async_trait]
impl EmotionAnalyzer for RuleBasedAnalyzer {
    fn name(&self) -> &str {
        "rule_based"
    }

    async fn analyze(&self, text: &str) -> Emotion {
        Self::classify(text)
    }
}
