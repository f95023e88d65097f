use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use affect_lights::config::{AppConfig, CliConfig, DeviceSettings, FileConfig};
use affect_lights::device::{
    GoveeHttpTransport, GoveeLightController, LightController, LoggingLightController,
};
use affect_lights::emotion::build_analyzer;
use affect_lights::orchestrator::SceneOrchestrator;
use affect_lights::scene::SceneCatalog;
use affect_lights::server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Emotion analyzer backend: rule_based, openai or claude.
    #[clap(long)]
    pub analyzer: Option<String>,

    #[clap(long)]
    pub device_api_key: Option<String>,

    #[clap(long)]
    pub device_sku: Option<String>,

    #[clap(long)]
    pub device_id: Option<String>,

    #[clap(long)]
    pub openai_api_key: Option<String>,

    #[clap(long)]
    pub claude_api_key: Option<String>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            port: args.port,
            logging_level: args.logging_level.clone(),
            analyzer: args.analyzer.clone(),
            device_api_key: args.device_api_key.clone(),
            device_sku: args.device_sku.clone(),
            device_id: args.device_id.clone(),
            openai_api_key: args.openai_api_key.clone(),
            claude_api_key: args.claude_api_key.clone(),
        }
    }
}

fn build_light_controller(device: Option<&DeviceSettings>) -> Arc<dyn LightController> {
    match device {
        Some(device) => {
            info!(
                "Controlling device {} ({}) via {}",
                device.device_id, device.sku, device.base_url
            );
            let transport = GoveeHttpTransport::new(
                device.base_url.clone(),
                device.api_key.clone(),
                Duration::from_secs(device.timeout_sec),
            );
            Arc::new(GoveeLightController::new(
                Arc::new(transport),
                device.sku.clone(),
                device.device_id.clone(),
            ))
        }
        None => {
            info!("No device configured, scenes will only be logged");
            Arc::new(LoggingLightController)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize tracing")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    let catalog = Arc::new(SceneCatalog::seeded());
    info!("Loaded {} scenes", catalog.len());

    let analyzer = build_analyzer(&app_config.analyzer);
    let lights = build_light_controller(app_config.device.as_ref());
    let orchestrator = Arc::new(SceneOrchestrator::new(catalog, analyzer, lights));

    info!(
        "Starting AffectLights server on port {} (analyzer: {})",
        app_config.port,
        orchestrator.analyzer_name()
    );
    run_server(orchestrator, app_config.logging_level, app_config.port).await
}
