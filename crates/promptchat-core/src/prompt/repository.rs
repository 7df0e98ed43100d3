//! Prompt repository trait.
//!
//! Defines the interface for prompt persistence operations.

use super::model::{Prompt, PromptPatch};

/// An abstract repository for managing prompt persistence.
///
/// Storage failures are absorbed below this trait and read as "no data",
/// so none of the operations can fail. Unknown ids are silently ignored by
/// `update` and `delete`.
pub trait PromptRepository: Send + Sync {
    /// Returns all prompts in insertion order.
    fn list(&self) -> Vec<Prompt>;

    /// Finds a prompt by its ID.
    fn find_by_id(&self, id: &str) -> Option<Prompt>;

    /// Creates a prompt with a fresh id and timestamps, appends it to the
    /// stored list and returns it.
    fn add(&self, name: &str, content: &str) -> Prompt;

    /// Merges `patch` into the prompt with `id` and refreshes `updated_at`.
    /// No-op if the id is unknown.
    fn update(&self, id: &str, patch: PromptPatch);

    /// Removes the prompt with `id`. No-op if the id is unknown.
    fn delete(&self, id: &str);
}
