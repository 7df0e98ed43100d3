//! Conversation domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::{Message, MessageDraft, Sender};
use crate::timestamp;

/// Maximum number of characters kept when deriving a title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Appended to a derived title that was truncated.
pub const TITLE_ELLIPSIS: &str = "...";

/// An ordered, append-only transcript with its own identity and title.
///
/// Insertion order of `messages` is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation identifier (UUID format)
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates an empty conversation with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Default label for a new conversation given how many are stored.
    ///
    /// Derived from the current count, so labels can repeat after deletions.
    pub fn default_title(existing_count: usize) -> String {
        format!("Conversation {}", existing_count + 1)
    }

    /// Appends a message built from `draft` and refreshes `updated_at`.
    ///
    /// When this is the first message and it comes from the user, the title
    /// is derived from its content.
    pub fn append(&mut self, draft: MessageDraft) -> &Message {
        if self.messages.is_empty() && draft.sender == Sender::User {
            self.title = derive_title(&draft.content);
        }

        let index = self.messages.len();
        self.messages.push(draft.into_message());
        self.updated_at = timestamp::advance(self.updated_at);
        &self.messages[index]
    }

    /// Merges the given fields and refreshes `updated_at`.
    pub fn apply(&mut self, patch: ConversationPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(messages) = patch.messages {
            self.messages = messages;
        }
        self.updated_at = timestamp::advance(self.updated_at);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Partial update for a [`Conversation`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationPatch {
    pub title: Option<String>,
    pub messages: Option<Vec<Message>>,
}

impl ConversationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }
}

/// Derives a conversation title from the first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends
/// [`TITLE_ELLIPSIS`] if anything was cut.
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{TITLE_ELLIPSIS}")
    } else {
        head
    }
}
