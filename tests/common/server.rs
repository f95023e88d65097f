//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own fake device provider and,
//! when asked for, its own fake LLM API.

use super::constants::*;
use super::fakes::{
    DeviceBehavior, FakeChatApi, FakeDeviceProvider, FakeMessagesApi, RecordedControl,
    RecordedMessages,
};
use affect_lights::config::{AnalyzerSettings, LlmProviderSettings};
use affect_lights::device::{GoveeHttpTransport, GoveeLightController, LightController};
use affect_lights::emotion::{build_analyzer, AnalyzerBackend};
use affect_lights::orchestrator::SceneOrchestrator;
use affect_lights::scene::SceneCatalog;
use affect_lights::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Which emotion analyzer the server under test runs
#[derive(Clone, Debug, Default)]
pub enum AnalyzerSetup {
    #[default]
    RuleBased,
    /// OpenAI backend pointed at a fake that always answers `reply`
    OpenAi { reply: &'static str },
    /// Claude backend pointed at a fake Messages API; `None` answers
    /// without any text block
    Claude { reply: Option<&'static str> },
}

/// Test server instance wired to fake collaborators
///
/// When dropped, the server and its fakes shut down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    device: FakeDeviceProvider,
    chat_api: Option<FakeChatApi>,
    messages_api: Option<FakeMessagesApi>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server with the rule based analyzer and a device that
    /// accepts every command.
    pub async fn spawn() -> Self {
        Self::spawn_with(DeviceBehavior::AcceptAll, AnalyzerSetup::RuleBased).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready
    /// within timeout.
    pub async fn spawn_with(behavior: DeviceBehavior, analyzer: AnalyzerSetup) -> Self {
        let device = FakeDeviceProvider::spawn(behavior).await;

        let mut analyzer_settings = AnalyzerSettings::default();
        let mut chat_api = None;
        let mut messages_api = None;
        match analyzer {
            AnalyzerSetup::RuleBased => {}
            AnalyzerSetup::OpenAi { reply } => {
                let api = FakeChatApi::spawn(reply).await;
                analyzer_settings.backend = AnalyzerBackend::OpenAi;
                analyzer_settings.openai = LlmProviderSettings {
                    api_key: Some(OPENAI_API_KEY.to_string()),
                    model: OPENAI_MODEL.to_string(),
                    base_url: api.base_url.clone(),
                };
                chat_api = Some(api);
            }
            AnalyzerSetup::Claude { reply } => {
                let api = FakeMessagesApi::spawn(reply).await;
                analyzer_settings.backend = AnalyzerBackend::Claude;
                analyzer_settings.claude = LlmProviderSettings {
                    api_key: Some(CLAUDE_API_KEY.to_string()),
                    model: CLAUDE_MODEL.to_string(),
                    base_url: api.base_url.clone(),
                };
                messages_api = Some(api);
            }
        }

        let transport = GoveeHttpTransport::new(
            device.base_url.clone(),
            DEVICE_API_KEY,
            Duration::from_secs(DEVICE_TIMEOUT_SECS),
        );
        let lights: Arc<dyn LightController> = Arc::new(GoveeLightController::new(
            Arc::new(transport),
            DEVICE_SKU,
            DEVICE_ID,
        ));
        let orchestrator = Arc::new(SceneOrchestrator::new(
            Arc::new(SceneCatalog::seeded()),
            build_analyzer(&analyzer_settings),
            lights,
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, orchestrator);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            device,
            chat_api,
            messages_api,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Control requests received by the fake device, in arrival order
    pub fn device_requests(&self) -> Vec<RecordedControl> {
        self.device.received()
    }

    /// Request bodies received by the fake chat API
    #[allow(dead_code)]
    pub fn chat_requests(&self) -> Vec<serde_json::Value> {
        self.chat_api
            .as_ref()
            .map(|api| api.calls())
            .unwrap_or_default()
    }

    /// Requests received by the fake Messages API
    #[allow(dead_code)]
    pub fn messages_requests(&self) -> Vec<RecordedMessages> {
        self.messages_api
            .as_ref()
            .map(|api| api.calls())
            .unwrap_or_default()
    }

    /// Waits for the server to become ready by polling the /ping endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/ping", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
