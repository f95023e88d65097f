use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,

    // Collaborators
    pub device: Option<DeviceConfig>,
    pub analyzer: Option<AnalyzerConfig>,
    pub openai: Option<LlmProviderConfig>,
    pub claude: Option<LlmProviderConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DeviceConfig {
    pub api_key: Option<String>,
    pub sku: Option<String>,
    pub device_id: Option<String>,
    pub base_url: Option<String>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Analyzer backend: "rule_based", "openai", "claude"
    pub backend: Option<String>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmProviderConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
