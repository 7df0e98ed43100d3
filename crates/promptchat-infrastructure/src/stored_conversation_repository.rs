//! Conversation repository backed by the [`RecordStore`].
//!
//! Conversations are kept most-recent-first under the `gpt-conversations`
//! record. The current-conversation pointer is a separate record and is
//! only reconciled with the list on delete.

use promptchat_core::conversation::{Conversation, ConversationPatch, ConversationRepository};

use crate::record_store::RecordStore;

/// [`ConversationRepository`] over the conversation and pointer records.
#[derive(Clone)]
pub struct StoredConversationRepository {
    store: RecordStore,
}

impl StoredConversationRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Loads the list, lets `f` modify the matching conversation, and saves.
    /// Nothing is written when no conversation has `id`.
    fn modify(&self, id: &str, f: impl FnOnce(&mut Conversation)) -> bool {
        let mut conversations = self.store.load_conversations();
        let Some(conversation) = conversations.iter_mut().find(|c| c.id == id) else {
            return false;
        };

        f(conversation);
        self.store.save_conversations(&conversations);
        true
    }
}

impl ConversationRepository for StoredConversationRepository {
    fn list(&self) -> Vec<Conversation> {
        self.store.load_conversations()
    }

    fn find_by_id(&self, id: &str) -> Option<Conversation> {
        self.store
            .load_conversations()
            .into_iter()
            .find(|c| c.id == id)
    }

    fn create_new(&self) -> Conversation {
        let mut conversations = self.store.load_conversations();
        let conversation = Conversation::new(Conversation::default_title(conversations.len()));

        conversations.insert(0, conversation.clone());
        self.store.save_conversations(&conversations);
        self.store.set_current_conversation_id(&conversation.id);

        tracing::debug!(
            id = %conversation.id,
            title = %conversation.title,
            "Created conversation"
        );
        conversation
    }

    fn update(&self, id: &str, patch: ConversationPatch) {
        if !self.modify(id, |c| c.apply(patch)) {
            tracing::debug!(id, "Conversation not found; update ignored");
        }
    }

    fn save(&self, conversation: &Conversation) {
        let saved = self.modify(&conversation.id, |stored| {
            *stored = conversation.clone();
        });
        if !saved {
            tracing::debug!(id = %conversation.id, "Conversation not found; save ignored");
        }
    }

    fn delete(&self, id: &str) {
        let mut conversations = self.store.load_conversations();
        let before = conversations.len();
        conversations.retain(|c| c.id != id);

        if conversations.len() != before {
            self.store.save_conversations(&conversations);
            tracing::debug!(id, "Deleted conversation");
        }

        if self.store.current_conversation_id().as_deref() == Some(id) {
            match conversations.first() {
                Some(next) => {
                    tracing::debug!(from = id, to = %next.id, "Reassigned current conversation");
                    self.store.set_current_conversation_id(&next.id);
                }
                None => {
                    tracing::debug!(id, "Cleared current conversation");
                    self.store.clear_current_conversation_id();
                }
            }
        }
    }

    fn current_id(&self) -> Option<String> {
        self.store.current_conversation_id()
    }

    fn set_current_id(&self, id: &str) {
        self.store.set_current_conversation_id(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use promptchat_core::conversation::MessageDraft;
    use promptchat_core::storage::{KeyValueStore, StorageKey};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup() -> (Arc<MemoryKeyValueStore>, StoredConversationRepository) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let repo = StoredConversationRepository::new(RecordStore::new(backend.clone()));
        (backend, repo)
    }

    fn raw(backend: &MemoryKeyValueStore) -> Option<String> {
        backend.read(StorageKey::Conversations).unwrap()
    }

    #[test]
    fn test_create_new_inserts_at_front_and_sets_current() {
        let (_, repo) = setup();

        let first = repo.create_new();
        let second = repo.create_new();

        assert_eq!(first.title, "Conversation 1");
        assert_eq!(second.title, "Conversation 2");
        assert!(first.messages.is_empty());

        let ids: Vec<_> = repo.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id]);
        assert_eq!(repo.current_id(), Some(second.id));
    }

    #[test]
    fn test_default_titles_can_repeat_after_delete() {
        let (_, repo) = setup();
        let first = repo.create_new();
        let second = repo.create_new();
        repo.delete(&first.id);

        let third = repo.create_new();

        assert_eq!(third.title, "Conversation 2");
        assert_eq!(third.title, second.title);
        assert_ne!(third.id, second.id);
    }

    #[test]
    fn test_update_and_save() {
        let (_, repo) = setup();
        let conversation = repo.create_new();

        repo.update(&conversation.id, ConversationPatch::new().with_title("Renamed"));
        let updated = repo.find_by_id(&conversation.id).unwrap();
        assert_eq!(updated.title, "Renamed");
        assert!(updated.updated_at >= conversation.updated_at);

        let mut edited = updated.clone();
        edited.append(MessageDraft::user_text("hello", "General Conversation"));
        repo.save(&edited);
        assert_eq!(repo.find_by_id(&conversation.id), Some(edited));
    }

    #[test]
    fn test_update_and_save_unknown_id_write_nothing() {
        let (backend, repo) = setup();
        repo.create_new();
        let before = raw(&backend);

        repo.update("missing", ConversationPatch::new().with_title("x"));
        repo.save(&Conversation::new("detached"));

        assert_eq!(raw(&backend), before);
    }

    #[test]
    fn test_delete_size_deltas() {
        let (backend, repo) = setup();
        let a = repo.create_new();
        repo.create_new();

        repo.delete(&a.id);
        assert_eq!(repo.list().len(), 1);

        let before = raw(&backend);
        repo.delete(&a.id);
        assert_eq!(repo.list().len(), 1);
        assert_eq!(raw(&backend), before);
    }

    #[test]
    fn test_delete_current_reassigns_to_first_remaining() {
        let (_, repo) = setup();
        let older = repo.create_new();
        let newer = repo.create_new();
        assert_eq!(repo.current_id(), Some(newer.id.clone()));

        repo.delete(&newer.id);

        assert_eq!(repo.current_id(), Some(older.id));
    }

    #[test]
    fn test_delete_last_clears_pointer() {
        let (backend, repo) = setup();
        let only = repo.create_new();

        repo.delete(&only.id);

        assert!(repo.list().is_empty());
        assert!(repo.current_id().is_none());
        assert!(backend.read(StorageKey::CurrentConversation).unwrap().is_none());
    }

    #[test]
    fn test_delete_non_current_keeps_pointer() {
        let (_, repo) = setup();
        let older = repo.create_new();
        let newer = repo.create_new();

        repo.delete(&older.id);

        assert_eq!(repo.current_id(), Some(newer.id));
    }

    #[test]
    fn test_delete_dangling_pointer_is_repaired() {
        let (_, repo) = setup();
        let existing = repo.create_new();
        repo.set_current_id("gone");

        repo.delete("gone");

        assert_eq!(repo.current_id(), Some(existing.id));
    }

    #[test]
    fn test_set_current_id_is_not_validated() {
        let (_, repo) = setup();
        repo.set_current_id("does-not-exist");
        assert_eq!(repo.current_id().as_deref(), Some("does-not-exist"));
    }

    #[test]
    fn test_survives_reopen_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let open = || {
            StoredConversationRepository::new(RecordStore::new(Arc::new(
                FileKeyValueStore::new(temp_dir.path()),
            )))
        };

        let mut conversation = open().create_new();
        conversation.append(MessageDraft::user_text("persist me", "General Conversation"));
        open().save(&conversation);

        let reopened = open();
        assert_eq!(reopened.current_id(), Some(conversation.id.clone()));
        assert_eq!(reopened.list(), vec![conversation]);
    }
}
