//! Configuration module
//!
//! Settings load from a TOML file (`~/.config/skyops/config.toml` by
//! default, overridable with the `SKYOPS_CONFIG` environment
//! variable). A missing file falls back to defaults; every section
//! and field is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::LatencyProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub latency: LatencyConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

/// REST server binding
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Simulated backend latency band
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Disable to answer storage calls immediately
    pub enabled: bool,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyConfig {
    pub fn profile(&self) -> LatencyProfile {
        if self.enabled {
            LatencyProfile {
                min_ms: self.min_ms,
                max_ms: self.max_ms,
            }
        } else {
            LatencyProfile::none()
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        let band = LatencyProfile::mock_backend();
        Self {
            enabled: true,
            min_ms: band.min_ms,
            max_ms: band.max_ms,
        }
    }
}

/// Default config file location: `<config dir>/skyops/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skyops")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.latency.enabled);
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 3000

            [latency]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.address(), "0.0.0.0:3000");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.latency.profile().max_ms, 0);
    }

    #[test]
    fn latency_band_passes_through_when_enabled() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [latency]
            enabled = true
            min_ms = 10
            max_ms = 20
            "#,
        )
        .unwrap();
        let profile = cfg.latency.profile();
        assert_eq!(profile.min_ms, 10);
        assert_eq!(profile.max_ms, 20);
    }
}
