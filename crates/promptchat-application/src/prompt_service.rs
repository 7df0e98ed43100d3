//! Prompt management with input validation.

use std::sync::Arc;

use promptchat_core::error::{Result, ValidationError};
use promptchat_core::prompt::{Prompt, PromptPatch, PromptRepository};

/// Validated front end to a [`PromptRepository`].
///
/// Names and contents must be non-empty after trimming. Values are stored
/// as given.
#[derive(Clone)]
pub struct PromptService {
    repository: Arc<dyn PromptRepository>,
}

impl PromptService {
    pub fn new(repository: Arc<dyn PromptRepository>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Vec<Prompt> {
        self.repository.list()
    }

    /// Finds a prompt by id, then by exact name, then by case-insensitive name.
    pub fn find(&self, id_or_name: &str) -> Option<Prompt> {
        let prompts = self.repository.list();

        if let Some(prompt) = prompts.iter().find(|p| p.id == id_or_name) {
            return Some(prompt.clone());
        }
        if let Some(prompt) = prompts.iter().find(|p| p.name == id_or_name) {
            return Some(prompt.clone());
        }

        let lowered = id_or_name.to_lowercase();
        prompts.into_iter().find(|p| p.name.to_lowercase() == lowered)
    }

    pub fn add(&self, name: &str, content: &str) -> Result<Prompt> {
        validate_name(name)?;
        validate_content(content)?;

        let prompt = self.repository.add(name, content);
        tracing::info!(id = %prompt.id, name = %prompt.name, "Prompt added");
        Ok(prompt)
    }

    /// Applies `patch` and returns the updated prompt, or `None` if no prompt
    /// has `id`.
    pub fn edit(&self, id: &str, patch: PromptPatch) -> Result<Option<Prompt>> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(content) = &patch.content {
            validate_content(content)?;
        }

        if self.repository.find_by_id(id).is_none() {
            return Ok(None);
        }

        self.repository.update(id, patch);
        Ok(self.repository.find_by_id(id))
    }

    /// Deletes the prompt with `id`. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let existed = self.repository.find_by_id(id).is_some();
        self.repository.delete(id);
        if existed {
            tracing::info!(id, "Prompt deleted");
        }
        existed
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyPromptName.into());
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyPromptContent.into());
    }
    Ok(())
}
