//! Application layer for promptchat.
//!
//! Coordinates the domain repositories and the assistant port into the
//! operations the presentation layer calls.

pub mod chat_controller;
pub mod prompt_service;

pub use chat_controller::{ChatController, ChatInput, ControllerState, PendingSend};
pub use prompt_service::PromptService;
