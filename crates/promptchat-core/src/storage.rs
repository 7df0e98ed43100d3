//! Key-value persistence port.
//!
//! The application keeps three independent records in a synchronous
//! key-value substrate. Backends implement [`KeyValueStore`]; the typed,
//! failure-tolerant layer lives in the infrastructure crate.

use std::fmt;

use crate::error::Result;

/// The logical records persisted by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Ordered list of prompts.
    Prompts,
    /// Ordered list of conversations, most recent first.
    Conversations,
    /// Bare id of the active conversation.
    CurrentConversation,
}

impl StorageKey {
    /// Every key, in a stable order.
    pub const ALL: [StorageKey; 3] = [
        StorageKey::Prompts,
        StorageKey::Conversations,
        StorageKey::CurrentConversation,
    ];

    /// Returns the raw key name used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Prompts => "gpt-prompts",
            StorageKey::Conversations => "gpt-conversations",
            StorageKey::CurrentConversation => "current-conversation-id",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous raw key-value storage.
///
/// Implementations report failures through `Result`; callers above this
/// port decide whether a failure is fatal.
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`, or `None` if absent.
    fn read(&self, key: StorageKey) -> Result<Option<String>>;

    /// Replaces the raw value stored under `key`.
    fn write(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: StorageKey) -> Result<()>;
}
