//! Prompt repository backed by the [`RecordStore`].
//!
//! The whole prompt list lives under a single record and is rewritten on
//! every mutation.

use promptchat_core::prompt::{Prompt, PromptPatch, PromptRepository};

use crate::record_store::RecordStore;

/// [`PromptRepository`] over the `gpt-prompts` record.
#[derive(Clone)]
pub struct StoredPromptRepository {
    store: RecordStore,
}

impl StoredPromptRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

impl PromptRepository for StoredPromptRepository {
    fn list(&self) -> Vec<Prompt> {
        self.store.load_prompts()
    }

    fn find_by_id(&self, id: &str) -> Option<Prompt> {
        self.store.load_prompts().into_iter().find(|p| p.id == id)
    }

    fn add(&self, name: &str, content: &str) -> Prompt {
        let prompt = Prompt::new(name, content);

        let mut prompts = self.store.load_prompts();
        prompts.push(prompt.clone());
        self.store.save_prompts(&prompts);

        tracing::debug!(id = %prompt.id, name = %prompt.name, "Added prompt");
        prompt
    }

    fn update(&self, id: &str, patch: PromptPatch) {
        let mut prompts = self.store.load_prompts();
        let Some(prompt) = prompts.iter_mut().find(|p| p.id == id) else {
            tracing::debug!(id, "Prompt not found; update ignored");
            return;
        };

        prompt.apply(patch);
        self.store.save_prompts(&prompts);
    }

    fn delete(&self, id: &str) {
        let mut prompts = self.store.load_prompts();
        let before = prompts.len();
        prompts.retain(|p| p.id != id);

        if prompts.len() == before {
            tracing::debug!(id, "Prompt not found; delete ignored");
            return;
        }

        self.store.save_prompts(&prompts);
        tracing::debug!(id, "Deleted prompt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use promptchat_core::storage::{KeyValueStore, StorageKey};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryKeyValueStore>, StoredPromptRepository) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let repo = StoredPromptRepository::new(RecordStore::new(backend.clone()));
        (backend, repo)
    }

    fn raw(backend: &MemoryKeyValueStore) -> Option<String> {
        backend.read(StorageKey::Prompts).unwrap()
    }

    #[test]
    fn test_add_then_list() {
        let (_, repo) = setup();

        let added = repo.add("Summarizer", "Summarize the text.");
        let prompts = repo.list();

        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], added);
        assert_eq!(prompts[0].name, "Summarizer");
        assert_eq!(prompts[0].content, "Summarize the text.");
        assert!(!prompts[0].id.is_empty());
    }

    #[test]
    fn test_add_keeps_insertion_order_and_unique_ids() {
        let (_, repo) = setup();

        let first = repo.add("First", "1");
        let second = repo.add("Second", "2");
        let third = repo.add("First", "1");

        let ids: Vec<_> = repo.list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id, third.id.clone()]);
        assert_ne!(first.id, third.id);
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let (_, repo) = setup();
        let prompt = repo.add("Name", "Content");

        repo.update(&prompt.id, PromptPatch::new().with_name("Renamed"));

        let updated = repo.find_by_id(&prompt.id).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.content, "Content");
        assert_eq!(updated.created_at, prompt.created_at);
        assert!(updated.updated_at >= prompt.updated_at);
    }

    #[test]
    fn test_update_unknown_id_leaves_record_untouched() {
        let (backend, repo) = setup();
        repo.add("Name", "Content");
        let before = raw(&backend);

        repo.update("missing", PromptPatch::new().with_content("x"));

        assert_eq!(raw(&backend), before);
    }

    #[test]
    fn test_delete_present_and_absent() {
        let (backend, repo) = setup();
        let keep = repo.add("Keep", "1");
        let drop = repo.add("Drop", "2");

        repo.delete(&drop.id);
        assert_eq!(repo.list(), vec![keep]);

        let before = raw(&backend);
        repo.delete(&drop.id);
        assert_eq!(repo.list().len(), 1);
        assert_eq!(raw(&backend), before);
    }

    #[test]
    fn test_find_by_id_missing() {
        let (_, repo) = setup();
        assert!(repo.find_by_id("nope").is_none());
    }
}
