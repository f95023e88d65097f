mod file_config;

pub use file_config::{AnalyzerConfig, DeviceConfig, FileConfig, LlmProviderConfig};

use crate::device::DEFAULT_GOVEE_BASE_URL;
use crate::emotion::AnalyzerBackend;
use crate::llm::{DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_OPENAI_BASE_URL};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub analyzer: Option<String>,
    pub device_api_key: Option<String>,
    pub device_sku: Option<String>,
    pub device_id: Option<String>,
    pub openai_api_key: Option<String>,
    pub claude_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,

    /// None when no device is configured; scenes are then only logged.
    pub device: Option<DeviceSettings>,
    pub analyzer: AnalyzerSettings,
}

#[derive(Debug, Clone)]
pub struct DeviceSettings {
    pub api_key: String,
    pub sku: String,
    pub device_id: String,
    pub base_url: String,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub backend: AnalyzerBackend,
    pub timeout_sec: u64,
    pub openai: LlmProviderSettings,
    pub claude: LlmProviderSettings,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            backend: AnalyzerBackend::RuleBased,
            timeout_sec: 30,
            openai: LlmProviderSettings::openai_defaults(),
            claude: LlmProviderSettings::claude_defaults(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl LlmProviderSettings {
    pub fn openai_defaults() -> Self {
        Self {
            api_key: None,
            model: "gpt-4".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn claude_defaults() -> Self {
        Self {
            api_key: None,
            model: "claude-3-5-haiku-latest".to_string(),
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
        }
    }

    fn merge(defaults: Self, file: Option<LlmProviderConfig>, cli_api_key: Option<&String>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            api_key: file.api_key.or_else(|| cli_api_key.cloned()),
            model: file.model.unwrap_or(defaults.model),
            base_url: file.base_url.unwrap_or(defaults.base_url),
        }
    }
}

pub const DEFAULT_DEVICE_TIMEOUT_SEC: u64 = 30;

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let device = resolve_device(cli, file.device.unwrap_or_default())?;

        let analyzer_file = file.analyzer.unwrap_or_default();
        let analyzer_defaults = AnalyzerSettings::default();
        let analyzer = AnalyzerSettings {
            backend: AnalyzerBackend::from_config(
                analyzer_file.backend.as_deref().or(cli.analyzer.as_deref()),
            ),
            timeout_sec: analyzer_file
                .timeout_sec
                .unwrap_or(analyzer_defaults.timeout_sec),
            openai: LlmProviderSettings::merge(
                analyzer_defaults.openai,
                file.openai,
                cli.openai_api_key.as_ref(),
            ),
            claude: LlmProviderSettings::merge(
                analyzer_defaults.claude,
                file.claude,
                cli.claude_api_key.as_ref(),
            ),
        };

        Ok(Self {
            port,
            logging_level,
            device,
            analyzer,
        })
    }
}

fn resolve_device(cli: &CliConfig, file: DeviceConfig) -> Result<Option<DeviceSettings>> {
    let api_key = file.api_key.or_else(|| cli.device_api_key.clone());
    let sku = file.sku.or_else(|| cli.device_sku.clone());
    let device_id = file.device_id.or_else(|| cli.device_id.clone());

    match (api_key, sku, device_id) {
        (Some(api_key), Some(sku), Some(device_id)) => Ok(Some(DeviceSettings {
            api_key,
            sku,
            device_id,
            base_url: file
                .base_url
                .unwrap_or_else(|| DEFAULT_GOVEE_BASE_URL.to_string()),
            timeout_sec: file.timeout_sec.unwrap_or(DEFAULT_DEVICE_TIMEOUT_SEC),
        })),
        (None, None, None) => Ok(None),
        (api_key, sku, device_id) => {
            let missing: Vec<&str> = [
                ("api_key", api_key.is_none()),
                ("sku", sku.is_none()),
                ("device_id", device_id.is_none()),
            ]
            .into_iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(name, _)| name)
            .collect();
            bail!(
                "Device configuration is incomplete, missing: {}",
                missing.join(", ")
            )
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
