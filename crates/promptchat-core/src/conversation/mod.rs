//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: Core conversation model (`Conversation`) and title derivation
//! - `message`: Message types (`Message`, `MessageDraft`, `MessageKind`, `Sender`)
//! - `repository`: Repository trait for conversation persistence

mod message;
mod model;
mod repository;

pub use message::{Message, MessageDraft, MessageKind, Sender};
pub use model::{
    Conversation, ConversationPatch, TITLE_ELLIPSIS, TITLE_MAX_CHARS, derive_title,
};
pub use repository::ConversationRepository;
