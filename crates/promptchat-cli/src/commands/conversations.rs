//! `promptchat conversations ...`

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::Colorize;

use super::{find_conversation, render};
use crate::bootstrap::AppContext;

#[derive(Subcommand)]
pub enum ConversationsAction {
    /// List conversations, most recent first
    List,
    /// Start a new conversation and make it current
    New,
    /// Make a conversation current
    Switch {
        /// Conversation id or unique id prefix
        id: String,
    },
    /// Delete a conversation
    Delete {
        /// Conversation id or unique id prefix
        id: String,
    },
    /// Print a conversation transcript (the current one by default)
    Show {
        /// Conversation id or unique id prefix
        id: Option<String>,
    },
}

pub fn run(context: &mut AppContext, action: ConversationsAction) -> Result<()> {
    let controller = &mut context.controller;

    match action {
        ConversationsAction::List => {
            let active_id = controller.active_conversation().map(|c| c.id.clone());
            for conversation in controller.conversations() {
                let active = active_id.as_deref() == Some(conversation.id.as_str());
                println!("{}", render::conversation_line(&conversation, active));
            }
        }
        ConversationsAction::New => {
            let conversation = controller.new_conversation()?;
            println!("{} {}", "Created".green(), conversation.id);
        }
        ConversationsAction::Switch { id } => {
            let conversations = controller.conversations();
            let Some(target) = find_conversation(&conversations, &id) else {
                bail!("No conversation matches '{id}'");
            };
            let conversation = controller.switch_conversation(&target.id)?;
            println!("{}", render::conversation_line(&conversation, true));
        }
        ConversationsAction::Delete { id } => {
            let conversations = controller.conversations();
            let Some(target) = find_conversation(&conversations, &id) else {
                bail!("No conversation matches '{id}'");
            };
            controller.delete_conversation(&target.id)?;
            println!("{} {}", "Deleted".green(), target.title);
        }
        ConversationsAction::Show { id } => match id {
            Some(id) => {
                let conversations = controller.conversations();
                let Some(target) = find_conversation(&conversations, &id) else {
                    bail!("No conversation matches '{id}'");
                };
                render::print_conversation(target);
            }
            None => match controller.active_conversation() {
                Some(active) => render::print_conversation(active),
                None => render::print_info("No active conversation."),
            },
        },
    }

    Ok(())
}
