//! Lighting scenes and the in-memory catalog that holds them.

mod catalog;
mod models;

pub use catalog::{CatalogError, SceneCatalog, MAX_BRIGHTNESS};
pub use models::{Emotion, RgbColor, Scene, UnknownEmotion};
