//! Prompt domain module.
//!
//! A prompt is a named, reusable system instruction applied to a
//! conversation turn.
//!
//! # Module Structure
//!
//! - `model`: `Prompt` and the `PromptPatch` update value
//! - `preset`: Prompts seeded on first run
//! - `repository`: Repository trait for prompt persistence

mod model;
mod preset;
mod repository;

pub use model::{Prompt, PromptPatch};
pub use preset::{DEFAULT_PROMPTS, DefaultPrompt};
pub use repository::PromptRepository;
