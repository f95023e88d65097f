//! Composes classification, catalog lookup and device control.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::device::{DeviceError, LightController};
use crate::emotion::EmotionAnalyzer;
use crate::scene::{Emotion, Scene, SceneCatalog};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Scene not found.")]
    SceneNotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Identifies a scene either by the emotion it maps to or by its name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSelector {
    pub emotion: Option<Emotion>,
    pub name: Option<String>,
}

impl SceneSelector {
    pub fn by_emotion(emotion: Emotion) -> Self {
        Self {
            emotion: Some(emotion),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            emotion: None,
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAnalysis {
    pub detected_emotion: Emotion,
    /// Set only when the scene was requested and successfully applied.
    pub applied_scene: Option<Scene>,
}

pub struct SceneOrchestrator {
    catalog: Arc<SceneCatalog>,
    analyzer: Arc<dyn EmotionAnalyzer>,
    lights: Arc<dyn LightController>,
}

impl SceneOrchestrator {
    pub fn new(
        catalog: Arc<SceneCatalog>,
        analyzer: Arc<dyn EmotionAnalyzer>,
        lights: Arc<dyn LightController>,
    ) -> Self {
        Self {
            catalog,
            analyzer,
            lights,
        }
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn lights_name(&self) -> &str {
        self.lights.name()
    }

    /// Resolves a scene without touching the device. The emotion is tried
    /// first, then the name when the emotion is absent or has no scene.
    pub fn resolve(&self, selector: &SceneSelector) -> Option<&Scene> {
        let by_emotion = selector
            .emotion
            .and_then(|emotion| self.catalog.by_emotion(emotion));
        if by_emotion.is_some() {
            return by_emotion;
        }

        selector
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .and_then(|name| self.catalog.by_name(name))
    }

    pub async fn apply_by_selector(
        &self,
        selector: &SceneSelector,
    ) -> Result<Scene, OrchestratorError> {
        let Some(scene) = self.resolve(selector) else {
            debug!(?selector, "No scene matches selector");
            return Err(OrchestratorError::SceneNotFound);
        };
        let scene = scene.clone();

        self.lights.apply_scene(&scene).await?;
        Ok(scene)
    }

    pub async fn apply_from_text(
        &self,
        text: &str,
        also_apply: bool,
    ) -> Result<TextAnalysis, OrchestratorError> {
        if text.trim().is_empty() {
            return Err(OrchestratorError::InvalidInput(
                "Text is required for emotion analysis.".to_string(),
            ));
        }

        let detected_emotion = self.analyzer.analyze(text).await;
        info!(
            analyzer = %self.analyzer.name(),
            emotion = %detected_emotion,
            "Detected emotion"
        );

        if !also_apply {
            return Ok(TextAnalysis {
                detected_emotion,
                applied_scene: None,
            });
        }

        let Some(scene) = self.catalog.by_emotion(detected_emotion).cloned() else {
            warn!(emotion = %detected_emotion, "No scene for detected emotion");
            return Ok(TextAnalysis {
                detected_emotion,
                applied_scene: None,
            });
        };

        self.lights.apply_scene(&scene).await?;
        Ok(TextAnalysis {
            detected_emotion,
            applied_scene: Some(scene),
        })
    }
}
