//! Subcommand implementations.

pub mod chat;
pub mod conversations;
pub mod prompts;
mod render;

use promptchat_core::conversation::Conversation;

/// Resolves a conversation by full id or by a unique id prefix.
pub(crate) fn find_conversation<'a>(
    conversations: &'a [Conversation],
    id_or_prefix: &str,
) -> Option<&'a Conversation> {
    if let Some(exact) = conversations.iter().find(|c| c.id == id_or_prefix) {
        return Some(exact);
    }

    let mut matches = conversations
        .iter()
        .filter(|c| !id_or_prefix.is_empty() && c.id.starts_with(id_or_prefix));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
