pub mod config_service;
pub mod image_file;
pub mod paths;
pub mod record_store;
pub mod storage;
pub mod stored_conversation_repository;
pub mod stored_prompt_repository;

pub use crate::config_service::{AppConfig, AssistantConfig, DelayWindow};
pub use crate::image_file::load_image;
pub use crate::paths::ChatPaths;
pub use crate::record_store::RecordStore;
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use crate::stored_conversation_repository::StoredConversationRepository;
pub use crate::stored_prompt_repository::StoredPromptRepository;
