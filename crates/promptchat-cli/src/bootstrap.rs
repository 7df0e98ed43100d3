//! Composition root: wires configuration, storage, repositories and the
//! assistant into an [`AppContext`].

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use promptchat_application::{ChatController, PromptService};
use promptchat_infrastructure::{
    AppConfig, ChatPaths, FileKeyValueStore, RecordStore, StoredConversationRepository,
    StoredPromptRepository,
};
use promptchat_interaction::SimulatedAssistant;

/// Everything a command needs.
pub struct AppContext {
    pub paths: ChatPaths,
    pub controller: ChatController,
    pub prompt_service: PromptService,
    pub assistant: SimulatedAssistant,
}

/// Loads `config.toml` from `explicit` or from the default location.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => ChatPaths::default().config_file()?,
    };

    AppConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}

/// The command-line data directory wins over the configured one.
pub fn resolve_paths(config: &AppConfig, data_dir: Option<&Path>) -> ChatPaths {
    ChatPaths::new(data_dir.or(config.storage.data_dir.as_deref()))
}

impl AppContext {
    pub fn build(config: &AppConfig, paths: ChatPaths) -> Result<Self> {
        let store_dir = paths.store_dir()?;
        tracing::info!(store = %store_dir.display(), "Opening record store");

        let store = RecordStore::new(Arc::new(FileKeyValueStore::new(store_dir)));
        let prompts = Arc::new(StoredPromptRepository::new(store.clone()));
        let conversations = Arc::new(StoredConversationRepository::new(store));

        let controller = ChatController::new(prompts.clone(), conversations);
        let prompt_service = PromptService::new(prompts);
        let assistant = SimulatedAssistant::new(&config.assistant);

        Ok(Self {
            paths,
            controller,
            prompt_service,
            assistant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_cli_data_dir_overrides_config() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/from/config"));

        let paths = resolve_paths(&config, Some(Path::new("/from/cli")));
        assert_eq!(paths.data_dir().unwrap(), PathBuf::from("/from/cli"));

        let paths = resolve_paths(&config, None);
        assert_eq!(paths.data_dir().unwrap(), PathBuf::from("/from/config"));
    }

    #[test]
    fn test_build_persists_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ChatPaths::new(Some(temp_dir.path()));

        let mut context = AppContext::build(&AppConfig::default(), paths).unwrap();
        context.controller.startup();

        assert_eq!(context.prompt_service.list().len(), 3);
        assert!(temp_dir.path().join("store/gpt-prompts.json").exists());
        assert!(temp_dir.path().join("store/current-conversation-id.json").exists());
    }

    #[test]
    fn test_explicit_missing_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(Some(&temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
