use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};
use crate::orchestrator::{OrchestratorError, SceneOrchestrator, SceneSelector};
use crate::scene::{Emotion, Scene};

const APP_NAME: &str = "AffectLights";

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Serialize)]
struct ServerStatus {
    pub app: &'static str,
    pub time: String,
    pub version: &'static str,
    pub hash: String,
    pub uptime: String,
    pub analyzer: String,
    pub lights: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ApplySceneBody {
    pub emotion: Option<String>,
    pub scene_name: Option<String>,
}

#[derive(Serialize)]
struct ApplySceneResponse {
    message: String,
    applied: Scene,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct AnalyzeEmotionBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub apply_to_lights: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeEmotionResponse {
    text: String,
    detected_emotion: Emotion,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied_scene: Option<Scene>,
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrchestratorError::SceneNotFound => StatusCode::NOT_FOUND,
            OrchestratorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::Device(err) => {
                error!("Light controller failed: {}", err);
                StatusCode::BAD_GATEWAY
            }
        };
        (status, MessageResponse::new(self.to_string())).into_response()
    }
}

impl From<ApplySceneBody> for SceneSelector {
    fn from(body: ApplySceneBody) -> Self {
        // An emotion the catalog cannot parse is treated as absent, so the
        // name still gets a chance.
        let emotion = body.emotion.as_deref().and_then(|value| {
            value
                .parse::<Emotion>()
                .map_err(|err| debug!("Ignoring emotion selector: {}", err))
                .ok()
        });
        SceneSelector {
            emotion,
            name: body.scene_name,
        }
    }
}

async fn ping() -> impl IntoResponse {
    MessageResponse::new("AffectLights API is alive!")
}

async fn status(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStatus {
        app: APP_NAME,
        time: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        hash: state.hash.clone(),
        uptime: format_uptime(state.start_time.elapsed()),
        analyzer: state.orchestrator.analyzer_name().to_string(),
        lights: state.orchestrator.lights_name().to_string(),
    })
}

async fn get_scenes(State(orchestrator): State<GuardedOrchestrator>) -> impl IntoResponse {
    Json(orchestrator.catalog().all().to_vec())
}

async fn apply_scene(
    State(orchestrator): State<GuardedOrchestrator>,
    Json(body): Json<ApplySceneBody>,
) -> Result<Json<ApplySceneResponse>, OrchestratorError> {
    let selector = SceneSelector::from(body);
    let scene = orchestrator.apply_by_selector(&selector).await?;

    Ok(Json(ApplySceneResponse {
        message: format!("Scene '{}' was sent to the light controller.", scene.name),
        applied: scene,
    }))
}

async fn analyze_emotion(
    State(orchestrator): State<GuardedOrchestrator>,
    Json(body): Json<AnalyzeEmotionBody>,
) -> Result<Json<AnalyzeEmotionResponse>, OrchestratorError> {
    let text = body.text.unwrap_or_default();
    let analysis = orchestrator
        .apply_from_text(&text, body.apply_to_lights)
        .await?;

    let message = match &analysis.applied_scene {
        Some(scene) => format!(
            "Detected emotion: {}. Applied scene: {}",
            analysis.detected_emotion, scene.name
        ),
        None => {
            if body.apply_to_lights {
                warn!(
                    "No scene applied for detected emotion {}",
                    analysis.detected_emotion
                );
            }
            format!("Detected emotion: {}", analysis.detected_emotion)
        }
    };

    Ok(Json(AnalyzeEmotionResponse {
        text,
        detected_emotion: analysis.detected_emotion,
        message,
        applied_scene: analysis.applied_scene,
    }))
}

pub fn make_app(config: ServerConfig, orchestrator: Arc<SceneOrchestrator>) -> Router {
    let state = ServerState::new(config, orchestrator);

    let lights_routes: Router = Router::new()
        .route("/apply-scene", post(apply_scene))
        .with_state(state.clone());

    Router::new()
        .route("/ping", get(ping))
        .route("/status", get(status))
        .route("/scenes", get(get_scenes))
        .route("/analyze-emotion", post(analyze_emotion))
        .with_state(state.clone())
        .nest("/lights", lights_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    orchestrator: Arc<SceneOrchestrator>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
