//! Assistant backends for promptchat.

pub mod simulated_assistant;

pub use crate::simulated_assistant::SimulatedAssistant;
