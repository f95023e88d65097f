//! In-process fakes of the external services the server talks to
//!
//! Every fake is a small axum app bound to a random local port.

use super::constants::*;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// How the fake device provider answers control requests
#[derive(Clone, Debug, Default)]
pub enum DeviceBehavior {
    /// Every command is accepted with code 200
    #[default]
    AcceptAll,
    /// Commands for `instance` get a structurally valid response with `code`
    RejectInstance { instance: &'static str, code: i64 },
    /// Commands for `instance` fail with HTTP 500
    FailInstance { instance: &'static str },
    /// Commands for `instance` get HTTP 200 with a body lacking `code`
    CodelessInstance { instance: &'static str },
}

/// A control request as seen by the fake device provider
#[derive(Clone, Debug)]
pub struct RecordedControl {
    pub api_key: Option<String>,
    pub body: Value,
}

impl RecordedControl {
    pub fn instance(&self) -> &str {
        self.body["payload"]["capability"]["instance"]
            .as_str()
            .unwrap_or_default()
    }

    pub fn value(&self) -> u64 {
        self.body["payload"]["capability"]["value"]
            .as_u64()
            .unwrap_or_default()
    }
}

#[derive(Clone)]
struct FakeDeviceState {
    behavior: DeviceBehavior,
    received: Arc<Mutex<Vec<RecordedControl>>>,
}

async fn device_control(
    State(state): State<FakeDeviceState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let recorded = RecordedControl {
        api_key: header_value(&headers, "Govee-API-Key"),
        body,
    };
    let instance = recorded.instance().to_string();
    let request_id = recorded.body["requestId"].clone();
    state.received.lock().unwrap().push(recorded);

    match state.behavior {
        DeviceBehavior::FailInstance { instance: failing } if failing == instance => {
            (StatusCode::INTERNAL_SERVER_ERROR, "device offline").into_response()
        }
        DeviceBehavior::RejectInstance {
            instance: rejected,
            code,
        } if rejected == instance => Json(json!({
            "requestId": request_id,
            "code": code,
            "msg": "Parameter value out of range",
        }))
        .into_response(),
        DeviceBehavior::CodelessInstance { instance: codeless } if codeless == instance => {
            Json(json!({ "message": "ok" })).into_response()
        }
        _ => Json(json!({
            "requestId": request_id,
            "code": 200,
            "msg": "success",
            "capability": {},
        }))
        .into_response(),
    }
}

/// Fake device provider cloud API
pub struct FakeDeviceProvider {
    pub base_url: String,
    received: Arc<Mutex<Vec<RecordedControl>>>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl FakeDeviceProvider {
    pub async fn spawn(behavior: DeviceBehavior) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = FakeDeviceState {
            behavior,
            received: received.clone(),
        };
        let app = Router::new()
            .route("/router/api/v1/device/control", post(device_control))
            .with_state(state);

        let (base_url, shutdown_tx) = serve(app).await;
        Self {
            base_url,
            received,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn received(&self) -> Vec<RecordedControl> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct FakeChatState {
    reply: String,
    calls: Arc<Mutex<Vec<Value>>>,
}

async fn chat_completions(State(state): State<FakeChatState>, Json(body): Json<Value>) -> Response {
    state.calls.lock().unwrap().push(body);
    Json(json!({
        "choices": [{
            "message": { "role": "assistant", "content": state.reply },
            "finish_reason": "stop",
        }],
        "usage": { "prompt_tokens": 60, "completion_tokens": 1, "total_tokens": 61 },
    }))
    .into_response()
}

/// Fake OpenAI-compatible chat API that always answers with `reply`
pub struct FakeChatApi {
    pub base_url: String,
    calls: Arc<Mutex<Vec<Value>>>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl FakeChatApi {
    pub async fn spawn(reply: impl Into<String>) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = FakeChatState {
            reply: reply.into(),
            calls: calls.clone(),
        };
        let app = Router::new()
            .route("/chat/completions", post(chat_completions))
            .with_state(state);

        let (base_url, shutdown_tx) = serve(app).await;
        Self {
            base_url,
            calls,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

/// A Messages API request as seen by the fake
#[derive(Clone, Debug)]
pub struct RecordedMessages {
    pub api_key: Option<String>,
    pub version: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeMessagesState {
    reply: Option<String>,
    calls: Arc<Mutex<Vec<RecordedMessages>>>,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn messages(
    State(state): State<FakeMessagesState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.calls.lock().unwrap().push(RecordedMessages {
        api_key: header_value(&headers, "x-api-key"),
        version: header_value(&headers, "anthropic-version"),
        body,
    });

    let content = match &state.reply {
        Some(text) => json!([{ "type": "text", "text": text }]),
        None => json!([{
            "type": "tool_use",
            "id": "toolu_01",
            "name": "classify",
            "input": {},
        }]),
    };
    Json(json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": content,
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 90, "output_tokens": 2 },
    }))
    .into_response()
}

/// Fake Anthropic Messages API
///
/// Answers with a single text block holding `reply`, or with no text block
/// at all when `reply` is `None`.
pub struct FakeMessagesApi {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedMessages>>>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl FakeMessagesApi {
    pub async fn spawn(reply: Option<&str>) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = FakeMessagesState {
            reply: reply.map(str::to_string),
            calls: calls.clone(),
        };
        let app = Router::new()
            .route("/v1/messages", post(messages))
            .with_state(state);

        let (base_url, shutdown_tx) = serve(app).await;
        Self {
            base_url,
            calls,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn calls(&self) -> Vec<RecordedMessages> {
        self.calls.lock().unwrap().clone()
    }
}

async fn serve(app: Router) -> (String, tokio::sync::oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake service");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Fake service failed");
    });

    (format!("http://127.0.0.1:{}", port), shutdown_tx)
}
