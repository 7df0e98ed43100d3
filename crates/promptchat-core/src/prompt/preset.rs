//! Default prompt presets.
//!
//! Seeded by the application controller whenever no prompt exists.

/// A prompt seeded on first run. Ids and timestamps are assigned on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPrompt {
    pub name: &'static str,
    pub content: &'static str,
}

/// The three prompts available on a fresh install:
/// - **General Conversation**: friendly general-purpose assistant
/// - **Image Analysis**: detailed description of an uploaded image
/// - **Translation**: translation into Korean
pub const DEFAULT_PROMPTS: [DefaultPrompt; 3] = [
    DefaultPrompt {
        name: "General Conversation",
        content: "Answer the user's questions as a friendly and helpful AI assistant.",
    },
    DefaultPrompt {
        name: "Image Analysis",
        content: "Analyze and describe the uploaded image in detail, including the objects, colors, composition, and mood you can see in it.",
    },
    DefaultPrompt {
        name: "Translation",
        content: "Translate the provided text into Korean. Provide a natural and accurate translation.",
    },
];
