//! `promptchat prompts ...`

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::Colorize;
use promptchat_core::prompt::PromptPatch;

use super::render;
use crate::bootstrap::AppContext;

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List stored prompts
    List,
    /// Add a prompt
    Add {
        /// Display name
        name: String,
        /// Instruction text sent with every message
        content: String,
    },
    /// Change a prompt's name or content
    Edit {
        /// Prompt id, id prefix or name
        prompt: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a prompt
    Delete {
        /// Prompt id, id prefix or name
        prompt: String,
    },
}

pub fn run(context: &AppContext, action: PromptsAction) -> Result<()> {
    let service = &context.prompt_service;

    match action {
        PromptsAction::List => {
            let prompts = service.list();
            if prompts.is_empty() {
                render::print_info("No prompts.");
            }
            for prompt in &prompts {
                println!("{}", render::prompt_line(prompt, false));
            }
        }
        PromptsAction::Add { name, content } => {
            let prompt = service.add(&name, &content)?;
            println!("{} {}", "Added".green(), prompt.id);
        }
        PromptsAction::Edit {
            prompt,
            name,
            content,
        } => {
            let patch = PromptPatch { name, content };
            if patch.is_empty() {
                bail!("Nothing to change; pass --name and/or --content");
            }
            let Some(target) = resolve(context, &prompt) else {
                bail!("No prompt matches '{prompt}'");
            };
            if let Some(updated) = service.edit(&target, patch)? {
                println!("{}", render::prompt_line(&updated, false));
            }
        }
        PromptsAction::Delete { prompt } => {
            let Some(target) = resolve(context, &prompt) else {
                bail!("No prompt matches '{prompt}'");
            };
            service.delete(&target);
            println!("{} {}", "Deleted".green(), target);
        }
    }

    Ok(())
}

/// Resolves an id, name or unique id prefix to a prompt id.
pub(crate) fn resolve(context: &AppContext, query: &str) -> Option<String> {
    if let Some(prompt) = context.prompt_service.find(query) {
        return Some(prompt.id);
    }

    let prompts = context.prompt_service.list();
    let mut matches = prompts
        .iter()
        .filter(|p| !query.is_empty() && p.id.starts_with(query));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.id.clone()),
        _ => None,
    }
}
