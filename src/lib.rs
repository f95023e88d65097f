//! AffectLights server library
//!
//! Maps free text or an explicit selector to a lighting scene and drives a
//! smart light through the provider's cloud control API.

pub mod config;
pub mod device;
pub mod emotion;
pub mod llm;
pub mod orchestrator;
pub mod scene;
pub mod server;

// Re-export commonly used types for convenience
pub use device::{GoveeLightController, LightController, LoggingLightController};
pub use emotion::{build_analyzer, EmotionAnalyzer};
pub use orchestrator::{SceneOrchestrator, SceneSelector};
pub use scene::{Emotion, Scene, SceneCatalog};
pub use server::{run_server, RequestsLoggingLevel};
