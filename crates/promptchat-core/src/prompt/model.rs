//! Prompt domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp;

/// A named, reusable system instruction.
///
/// `id` is assigned once at creation and never changes. Only `name` and
/// `content` are externally mutable, through [`PromptPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Display name
    pub name: String,
    /// Instruction text sent alongside user input
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    /// Creates a prompt with a fresh id and `created_at == updated_at == now`.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the given fields and refreshes `updated_at`.
    pub fn apply(&mut self, patch: PromptPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = timestamp::advance(self.updated_at);
    }
}

/// Partial update for a [`Prompt`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptPatch {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl PromptPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Returns true if the patch changes no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none()
    }
}
