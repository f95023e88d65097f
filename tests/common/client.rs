//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint. When API routes or
//! request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Service Endpoints
    // ========================================================================

    pub async fn ping(&self) -> Response {
        self.client
            .get(format!("{}/ping", self.base_url))
            .send()
            .await
            .expect("Ping request failed")
    }

    pub async fn status(&self) -> Response {
        self.client
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .expect("Status request failed")
    }

    // ========================================================================
    // Scene Endpoints
    // ========================================================================

    pub async fn get_scenes(&self) -> Response {
        self.client
            .get(format!("{}/scenes", self.base_url))
            .send()
            .await
            .expect("Get scenes request failed")
    }

    pub async fn apply_scene_by_emotion(&self, emotion: &str) -> Response {
        self.apply_scene(json!({ "emotion": emotion })).await
    }

    pub async fn apply_scene_by_name(&self, scene_name: &str) -> Response {
        self.apply_scene(json!({ "sceneName": scene_name })).await
    }

    pub async fn apply_scene(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/lights/apply-scene", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Apply scene request failed")
    }

    // ========================================================================
    // Analysis Endpoints
    // ========================================================================

    pub async fn analyze_emotion(&self, text: &str, apply_to_lights: bool) -> Response {
        self.client
            .post(format!("{}/analyze-emotion", self.base_url))
            .json(&json!({ "text": text, "applyToLights": apply_to_lights }))
            .send()
            .await
            .expect("Analyze emotion request failed")
    }
}
