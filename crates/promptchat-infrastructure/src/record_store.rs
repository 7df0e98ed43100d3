//! Typed, failure-tolerant access to the three persisted records.
//!
//! `RecordStore` is the boundary where storage failures stop. Reads that
//! fail, or that return data which does not parse, are logged and treated as
//! "no data". Writes that fail are logged and dropped.

use promptchat_core::conversation::Conversation;
use promptchat_core::prompt::Prompt;
use promptchat_core::storage::{KeyValueStore, StorageKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// The persistence store shared by both repositories.
///
/// Values are JSON with camelCase field names. Timestamps are RFC 3339
/// strings and are parsed back into `DateTime<Utc>` on every read, down to
/// each message of each conversation. The current-conversation pointer is
/// stored as a bare string.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Returns the raw value stored under `key`, or `None` on absence or failure.
    pub fn raw(&self, key: StorageKey) -> Option<String> {
        match self.backend.read(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to read record; treating as empty");
                None
            }
        }
    }

    // ============================================================================
    // Prompts
    // ============================================================================

    pub fn load_prompts(&self) -> Vec<Prompt> {
        self.load_list(StorageKey::Prompts)
    }

    pub fn save_prompts(&self, prompts: &[Prompt]) {
        self.save_list(StorageKey::Prompts, prompts);
    }

    // ============================================================================
    // Conversations
    // ============================================================================

    pub fn load_conversations(&self) -> Vec<Conversation> {
        self.load_list(StorageKey::Conversations)
    }

    pub fn save_conversations(&self, conversations: &[Conversation]) {
        self.save_list(StorageKey::Conversations, conversations);
    }

    // ============================================================================
    // Current conversation pointer
    // ============================================================================

    pub fn current_conversation_id(&self) -> Option<String> {
        self.raw(StorageKey::CurrentConversation)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }

    pub fn set_current_conversation_id(&self, id: &str) {
        if let Err(e) = self.backend.write(StorageKey::CurrentConversation, id) {
            tracing::error!(id, error = %e, "Failed to save current conversation id");
        }
    }

    pub fn clear_current_conversation_id(&self) {
        if let Err(e) = self.backend.remove(StorageKey::CurrentConversation) {
            tracing::error!(error = %e, "Failed to clear current conversation id");
        }
    }

    fn load_list<T: DeserializeOwned>(&self, key: StorageKey) -> Vec<T> {
        let Some(raw) = self.raw(key) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to parse stored records; treating as empty");
                Vec::new()
            }
        }
    }

    fn save_list<T: Serialize>(&self, key: StorageKey, records: &[T]) {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to serialize records");
                return;
            }
        };

        if let Err(e) = self.backend.write(key, &raw) {
            tracing::error!(key = %key, error = %e, "Failed to save records");
        } else {
            tracing::debug!(key = %key, count = records.len(), "Saved records");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use chrono::{Duration, Utc};
    use promptchat_core::conversation::MessageDraft;
    use promptchat_core::error::{ChatError, Result};
    use tempfile::TempDir;

    /// Backend that fails every operation, like storage that is unavailable.
    struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn read(&self, _key: StorageKey) -> Result<Option<String>> {
            Err(ChatError::storage("unavailable"))
        }

        fn write(&self, _key: StorageKey, _value: &str) -> Result<()> {
            Err(ChatError::storage("quota exceeded"))
        }

        fn remove(&self, _key: StorageKey) -> Result<()> {
            Err(ChatError::storage("unavailable"))
        }
    }

    fn memory_store() -> (Arc<MemoryKeyValueStore>, RecordStore) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = RecordStore::new(backend.clone());
        (backend, store)
    }

    #[test]
    fn test_empty_store_reads_empty() {
        let (_, store) = memory_store();
        assert!(store.load_prompts().is_empty());
        assert!(store.load_conversations().is_empty());
        assert!(store.current_conversation_id().is_none());
    }

    #[test]
    fn test_corrupt_record_reads_empty() {
        let (backend, store) = memory_store();
        backend.write(StorageKey::Conversations, "{not json").unwrap();
        backend.write(StorageKey::Prompts, r#"[{"id": 1}]"#).unwrap();

        assert!(store.load_conversations().is_empty());
        assert!(store.load_prompts().is_empty());
    }

    #[test]
    fn test_unavailable_backend_degrades_silently() {
        let store = RecordStore::new(Arc::new(UnavailableStore));

        store.save_prompts(&[Prompt::new("a", "b")]);
        store.set_current_conversation_id("abc");
        store.clear_current_conversation_id();

        assert!(store.load_prompts().is_empty());
        assert!(store.current_conversation_id().is_none());
    }

    #[test]
    fn test_timestamps_reconstructed_chronologically() {
        let (_, store) = memory_store();

        let mut older = Conversation::new("older");
        older.created_at = Utc::now() - Duration::hours(2);
        older.updated_at = older.created_at;
        older.append(MessageDraft::user_text("first", "p"));
        older.messages[0].timestamp = Utc::now() - Duration::hours(1);
        older.append(MessageDraft::assistant_text("second"));

        let newer = Conversation::new("newer");
        store.save_conversations(&[newer.clone(), older.clone()]);

        let loaded = store.load_conversations();
        assert_eq!(loaded, vec![newer, older]);

        // Compare as instants, not strings
        assert!(loaded[1].created_at < loaded[0].created_at);
        let messages = &loaded[1].messages;
        assert!(messages[0].timestamp < messages[1].timestamp);
        assert!(messages[1].timestamp - messages[0].timestamp >= Duration::minutes(59));
    }

    #[test]
    fn test_pointer_is_bare_string() {
        let (backend, store) = memory_store();
        store.set_current_conversation_id("abc-123");

        assert_eq!(
            backend.read(StorageKey::CurrentConversation).unwrap().as_deref(),
            Some("abc-123")
        );
        assert_eq!(store.current_conversation_id().as_deref(), Some("abc-123"));

        store.clear_current_conversation_id();
        assert!(store.current_conversation_id().is_none());
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(Arc::new(FileKeyValueStore::new(temp_dir.path())));

        let prompt = Prompt::new("Name", "Content");
        store.save_prompts(std::slice::from_ref(&prompt));

        let reopened = RecordStore::new(Arc::new(FileKeyValueStore::new(temp_dir.path())));
        assert_eq!(reopened.load_prompts(), vec![prompt]);
    }

    #[test]
    fn test_reads_records_written_by_other_clients() {
        let (backend, store) = memory_store();
        let raw = r#"[{"id":"c1","title":"Hello","messages":[{"id":"m1","content":"Hello","type":"image","sender":"user","timestamp":"2024-05-01T10:00:00.000Z","promptUsed":"Image Analysis","imageUrl":"blob:abc"}],"createdAt":"2024-05-01T09:59:00.000Z","updatedAt":"2024-05-01T10:00:00.000Z"}]"#;
        backend.write(StorageKey::Conversations, raw).unwrap();

        let loaded = store.load_conversations();
        assert_eq!(loaded.len(), 1);
        let message = &loaded[0].messages[0];
        assert_eq!(message.image_url.as_deref(), Some("blob:abc"));
        assert!(loaded[0].created_at < message.timestamp);
    }
}
