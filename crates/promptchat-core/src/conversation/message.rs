//! Conversation message types.
//!
//! Messages are created only by appending to a conversation and are never
//! edited or removed individually.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
}

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single message in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Name of the prompt selected when a user message was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_used: Option<String>,
    /// Transient preview reference; only set on image messages and not
    /// guaranteed to resolve after a restart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Caller-supplied message content; id and timestamp are assigned on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub content: String,
    pub kind: MessageKind,
    pub sender: Sender,
    pub prompt_used: Option<String>,
    pub image_url: Option<String>,
}

impl MessageDraft {
    /// A text message typed by the user.
    pub fn user_text(content: impl Into<String>, prompt_used: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            sender: Sender::User,
            prompt_used: Some(prompt_used.into()),
            image_url: None,
        }
    }

    /// An image uploaded by the user.
    pub fn user_image(
        content: impl Into<String>,
        prompt_used: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Image,
            sender: Sender::User,
            prompt_used: Some(prompt_used.into()),
            image_url: Some(image_url.into()),
        }
    }

    /// A text reply from the assistant.
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            sender: Sender::Assistant,
            prompt_used: None,
            image_url: None,
        }
    }

    /// Materializes the draft with a fresh id and the current time.
    ///
    /// `image_url` is dropped unless the message is an image.
    pub fn into_message(self) -> Message {
        let image_url = self.image_url.filter(|_| self.kind == MessageKind::Image);
        Message {
            id: Uuid::new_v4().to_string(),
            content: self.content,
            kind: self.kind,
            sender: self.sender,
            timestamp: Utc::now(),
            prompt_used: self.prompt_used,
            image_url,
        }
    }
}
