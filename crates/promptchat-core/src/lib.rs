//! Domain layer for promptchat.
//!
//! Holds the models, repository traits and ports shared by every other
//! crate. Nothing in here performs I/O.

pub mod assistant;
pub mod conversation;
pub mod error;
pub mod prompt;
pub mod storage;
pub mod timestamp;

// Re-export common error types
pub use error::{ChatError, Result, ValidationError};
