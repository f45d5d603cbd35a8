use push_core::{ForegroundPolicy, NotificationChannel};
use push_platform::{NativeConfig, PlatformKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub platform: PlatformKind,
    pub device: DeviceConfig,
    pub foreground: ForegroundPolicy,
    pub channel: Option<NotificationChannel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub is_device: bool,
    pub endpoint_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            platform: PlatformKind::Native,
            device: DeviceConfig::default(),
            foreground: ForegroundPolicy::default(),
            channel: Some(NotificationChannel::default()),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let native = NativeConfig::default();
        Self {
            is_device: native.is_device,
            endpoint_base: native.endpoint_base,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("push-demo")
            .join("config.toml")
    }

    /// Replace the relay URL when an override is present.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn native(&self) -> NativeConfig {
        NativeConfig {
            is_device: self.device.is_device,
            endpoint_base: self.device.endpoint_base.clone(),
        }
    }
}
