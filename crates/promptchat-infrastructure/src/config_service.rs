//! Application configuration loaded from `config.toml`.
//!
//! Every key is optional. A missing file yields [`AppConfig::default`]; a
//! file that does not parse or holds out-of-range values is a
//! [`ChatError::Config`].

use promptchat_core::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub assistant: AssistantConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Replaces the platform data directory when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Behaviour of the simulated assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub text_delay_ms: DelayWindow,
    pub image_delay_ms: DelayWindow,
    /// Probability in `[0, 1]` that a call fails.
    pub failure_rate: f64,
}

impl AssistantConfig {
    /// No latency and no failures.
    pub fn instant() -> Self {
        Self {
            text_delay_ms: DelayWindow::ZERO,
            image_delay_ms: DelayWindow::ZERO,
            failure_rate: 0.0,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            text_delay_ms: DelayWindow::new(1000, 3000),
            image_delay_ms: DelayWindow::new(2000, 5000),
            failure_rate: 0.0,
        }
    }
}

/// Half-open latency window in milliseconds: `min <= delay < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayWindow {
    pub min: u64,
    pub max: u64,
}

impl DelayWindow {
    pub const ZERO: Self = Self { min: 0, max: 0 };

    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration at `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ChatError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&content)
            .map_err(|e| ChatError::config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ChatError::config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, window) in [
            ("assistant.text_delay_ms", self.assistant.text_delay_ms),
            ("assistant.image_delay_ms", self.assistant.image_delay_ms),
        ] {
            if window.min > window.max {
                return Err(ChatError::config(format!(
                    "{key}: min ({}) must not exceed max ({})",
                    window.min, window.max
                )));
            }
        }

        let rate = self.assistant.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ChatError::config(format!(
                "assistant.failure_rate must be within [0, 1], got {rate}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load(&temp_dir.path().join("config.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.assistant.text_delay_ms, DelayWindow::new(1000, 3000));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [assistant]
            failure_rate = 0.25
            text_delay_ms = { min = 10, max = 20 }
            "#,
        )
        .unwrap();

        assert_eq!(config.assistant.failure_rate, 0.25);
        assert_eq!(config.assistant.text_delay_ms, DelayWindow::new(10, 20));
        assert_eq!(config.assistant.image_delay_ms, DelayWindow::new(2000, 5000));
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_storage_dir_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[storage]\ndata_dir = \"/srv/promptchat\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/promptchat")));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[assistant\nfailure_rate = ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(AppConfig::parse("[assistant]\nfailure_rate = 1.5\n")
            .unwrap_err()
            .is_config());
        assert!(
            AppConfig::parse("[assistant]\nimage_delay_ms = { min = 5, max = 1 }\n")
                .unwrap_err()
                .is_config()
        );
    }
}
