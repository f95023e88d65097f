use std::collections::HashMap;
use thiserror::Error;
use tracing::error;

use super::{Emotion, RgbColor, Scene};

pub const MAX_BRIGHTNESS: u8 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Emotion {emotion} is mapped by both {first:?} and {second:?}")]
    DuplicateEmotion {
        emotion: Emotion,
        first: String,
        second: String,
    },

    #[error("Scene name {0:?} is used more than once")]
    DuplicateName(String),

    #[error("Scene {name:?} has brightness {brightness}, max is {MAX_BRIGHTNESS}")]
    BrightnessOutOfRange { name: String, brightness: u8 },
}

/// Immutable registry of lighting scenes.
///
/// Built once at startup, then only read. Lookups by emotion and by
/// (lowercased) name go through indices computed at construction.
#[derive(Debug, Clone)]
pub struct SceneCatalog {
    scenes: Vec<Scene>,
    by_emotion: HashMap<Emotion, usize>,
    by_name: HashMap<String, usize>,
}

impl SceneCatalog {
    pub fn new(scenes: Vec<Scene>) -> Result<Self, CatalogError> {
        let mut by_emotion: HashMap<Emotion, usize> = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for (index, scene) in scenes.iter().enumerate() {
            if scene.brightness > MAX_BRIGHTNESS {
                return Err(CatalogError::BrightnessOutOfRange {
                    name: scene.name.clone(),
                    brightness: scene.brightness,
                });
            }

            if let Some(&existing) = by_emotion.get(&scene.emotion) {
                return Err(CatalogError::DuplicateEmotion {
                    emotion: scene.emotion,
                    first: scenes[existing].name.clone(),
                    second: scene.name.clone(),
                });
            }
            by_emotion.insert(scene.emotion, index);

            let key = scene.name.to_lowercase();
            if by_name.contains_key(&key) {
                return Err(CatalogError::DuplicateName(scene.name.clone()));
            }
            by_name.insert(key, index);
        }

        Ok(Self {
            scenes,
            by_emotion,
            by_name,
        })
    }

    /// The default scene set, one per emotion.
    pub fn seeded() -> Self {
        Self::new(seed_scenes()).unwrap_or_else(|e| {
            error!(error = %e, "Seed scenes failed validation, starting with an empty catalog");
            Self {
                scenes: Vec::new(),
                by_emotion: HashMap::new(),
                by_name: HashMap::new(),
            }
        })
    }

    /// All scenes, in insertion order.
    pub fn all(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn by_emotion(&self, emotion: Emotion) -> Option<&Scene> {
        self.by_emotion.get(&emotion).map(|&index| &self.scenes[index])
    }

    /// Case-insensitive exact match on the scene name.
    pub fn by_name(&self, name: &str) -> Option<&Scene> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.scenes[index])
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            "CalmBlue",
            Emotion::Calm,
            RgbColor::new(80, 120, 255),
            40,
            "fade",
        ),
        Scene::new(
            "StressedRed",
            Emotion::Stressed,
            RgbColor::new(200, 60, 60),
            65,
            "pulse",
        ),
        Scene::new(
            "UpbeatTeal",
            Emotion::Upbeat,
            RgbColor::new(0, 200, 160),
            75,
            "shimmer",
        ),
        Scene::new(
            "LowPurple",
            Emotion::Low,
            RgbColor::new(140, 80, 200),
            30,
            "slow-fade",
        ),
    ]
}
