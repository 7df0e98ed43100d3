//! Conversation repository trait.
//!
//! Defines the interface for conversation persistence operations.

use super::model::{Conversation, ConversationPatch};

/// An abstract repository for managing conversation persistence.
///
/// Conversations are stored most-recent-first. The current-conversation
/// pointer is an independent record that is not validated on write and may
/// reference a conversation that no longer exists.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Absorbing storage failures (reads degrade to empty)
/// - Reassigning the current pointer when its conversation is deleted
pub trait ConversationRepository: Send + Sync {
    /// Returns all conversations, most recent first.
    fn list(&self) -> Vec<Conversation>;

    /// Finds a conversation by its ID.
    fn find_by_id(&self, id: &str) -> Option<Conversation>;

    /// Creates an empty conversation titled `"Conversation N"`, inserts it at
    /// the front, persists it and makes it current.
    fn create_new(&self) -> Conversation;

    /// Merges `patch` into the conversation with `id` and refreshes
    /// `updated_at`. No-op if the id is unknown.
    fn update(&self, id: &str, patch: ConversationPatch);

    /// Replaces the stored conversation that has the same id with
    /// `conversation` as given. No-op if the id is unknown.
    fn save(&self, conversation: &Conversation);

    /// Removes the conversation with `id`.
    ///
    /// If it was current, the pointer moves to the first remaining
    /// conversation, or is cleared when none remain.
    fn delete(&self, id: &str);

    /// Returns the id stored in the current-conversation pointer.
    fn current_id(&self) -> Option<String>;

    /// Overwrites the current-conversation pointer.
    fn set_current_id(&self, id: &str);
}
