//! Path resolution for promptchat configuration and data.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/promptchat/          # Config directory
//! └── config.toml                # Optional application configuration
//!
//! ~/.local/share/promptchat/     # Data directory (overridable)
//! ├── store/                     # Key-value records
//! │   ├── gpt-prompts.json
//! │   ├── gpt-conversations.json
//! │   └── current-conversation-id.json
//! └── logs/
//!     └── promptchat.log.YYYY-MM-DD
//! ```

use promptchat_core::error::{ChatError, Result};
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data roots.
pub const APP_NAME: &str = "promptchat";

const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_DIR_NAME: &str = "store";
const LOGS_DIR_NAME: &str = "logs";

/// Resolves where promptchat keeps its files.
///
/// The data directory can be overridden (command line, config file, tests);
/// otherwise the platform defaults from `dirs` are used.
#[derive(Debug, Clone, Default)]
pub struct ChatPaths {
    data_dir_override: Option<PathBuf>,
}

impl ChatPaths {
    /// Creates a resolver. `data_dir` replaces the platform data directory
    /// when given.
    pub fn new(data_dir: Option<&Path>) -> Self {
        Self {
            data_dir_override: data_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the promptchat configuration directory (e.g. `~/.config/promptchat/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or_else(|| ChatError::config("Cannot determine config directory"))
    }

    /// Returns the path of the default `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the data directory, honoring the override.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir_override {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or_else(|| ChatError::config("Cannot determine data directory"))
    }

    /// Directory holding the persisted records.
    pub fn store_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORE_DIR_NAME))
    }

    /// Directory holding rolling log files.
    pub fn logs_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(LOGS_DIR_NAME))
    }
}
