//! `promptchat chat` - interactive REPL over the active conversation.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use promptchat_application::ChatInput;
use promptchat_core::ChatError;
use promptchat_core::assistant::AssistantClient;
use promptchat_infrastructure::load_image;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::{find_conversation, prompts, render};
use crate::bootstrap::AppContext;

const SLASH_COMMANDS: [&str; 10] = [
    "/image", "/prompt", "/prompts", "/new", "/list", "/switch", "/delete", "/show", "/help",
    "/quit",
];

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Send(String),
    Image(Option<PathBuf>),
    SelectPrompt(String),
    ListPrompts,
    New,
    List,
    Switch(String),
    Delete(String),
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.starts_with('/') {
            return Some(Self::Send(line.to_string()));
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };
        let arg = arg.to_string();

        Some(match name {
            "/image" => Self::Image((!arg.is_empty()).then(|| PathBuf::from(arg))),
            "/prompt" => Self::SelectPrompt(arg),
            "/prompts" => Self::ListPrompts,
            "/new" => Self::New,
            "/list" => Self::List,
            "/switch" => Self::Switch(arg),
            "/delete" => Self::Delete(arg),
            "/show" => Self::Show,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Completion, hints and highlighting for slash commands.
struct ReplHelper;

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = SLASH_COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        SLASH_COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ReplHelper {}

pub async fn run(context: &mut AppContext, prompt: Option<String>) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    println!("{}", "=== promptchat ===".bright_magenta().bold());
    if let Ok(dir) = context.paths.data_dir() {
        render::print_info(&format!("Data: {}", dir.display()));
    }
    render::print_info("Type /help for commands.");
    println!();

    match prompt {
        Some(query) => select_prompt(context, &query),
        None => render::print_info("Select a prompt with /prompt <name> before sending."),
    }
    if let Some(active) = context.controller.active_conversation() {
        render::print_conversation(active);
    }

    loop {
        let label = context
            .controller
            .selected_prompt()
            .map(|p| p.name)
            .unwrap_or_else(|| "no prompt".to_string());

        let line = match rl.readline(&format!("[{label}] >> ")) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let Some(command) = ReplCommand::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.as_str());

        match command {
            ReplCommand::Send(text) => send(context, ChatInput::Text(text)).await,
            ReplCommand::Image(path) => {
                let image = match path.as_deref().map(load_image).transpose() {
                    Ok(image) => image,
                    Err(e) => {
                        render::print_error(&e);
                        continue;
                    }
                };
                send(context, ChatInput::Image(image)).await;
            }
            ReplCommand::SelectPrompt(query) => select_prompt(context, &query),
            ReplCommand::ListPrompts => {
                let selected = context.controller.selected_prompt().map(|p| p.id);
                for prompt in context.controller.prompts() {
                    let is_selected = selected.as_deref() == Some(prompt.id.as_str());
                    println!("{}", render::prompt_line(&prompt, is_selected));
                }
            }
            ReplCommand::New => match context.controller.new_conversation() {
                Ok(conversation) => render::print_conversation(&conversation),
                Err(e) => render::print_error(&e),
            },
            ReplCommand::List => {
                let active_id = context.controller.active_conversation().map(|c| c.id.clone());
                for conversation in context.controller.conversations() {
                    let active = active_id.as_deref() == Some(conversation.id.as_str());
                    println!("{}", render::conversation_line(&conversation, active));
                }
            }
            ReplCommand::Switch(id) => {
                let conversations = context.controller.conversations();
                let result = match find_conversation(&conversations, &id) {
                    Some(target) => context.controller.switch_conversation(&target.id),
                    None => Err(ChatError::not_found("Conversation", id)),
                };
                match result {
                    Ok(conversation) => render::print_conversation(&conversation),
                    Err(e) => render::print_error(&e),
                }
            }
            ReplCommand::Delete(id) => {
                let conversations = context.controller.conversations();
                let result = match find_conversation(&conversations, &id) {
                    Some(target) => context.controller.delete_conversation(&target.id),
                    None => Err(ChatError::not_found("Conversation", id)),
                };
                match result {
                    Ok(()) => {
                        if let Some(active) = context.controller.active_conversation() {
                            render::print_info(&format!("Now in: {}", active.title));
                        }
                    }
                    Err(e) => render::print_error(&e),
                }
            }
            ReplCommand::Show => {
                if let Some(active) = context.controller.active_conversation() {
                    render::print_conversation(active);
                }
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(name) => {
                println!("{}", format!("Unknown command: {name}").bright_black());
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

async fn send(context: &mut AppContext, input: ChatInput) {
    let pending = match context.controller.begin_send(input) {
        Ok(pending) => pending,
        Err(e) => {
            render::print_error(&e);
            return;
        }
    };

    if let Some(message) = context
        .controller
        .active_conversation()
        .and_then(|c| c.last_message())
    {
        render::print_message(message);
    }
    render::print_info("assistant is typing...");

    let response = context.assistant.send(pending.request()).await;

    if let Some(reply) = context.controller.complete_send(pending, response) {
        render::print_message(&reply);
    }
}

fn select_prompt(context: &mut AppContext, query: &str) {
    let result = match prompts::resolve(context, query) {
        Some(id) => context.controller.select_prompt(&id),
        None => Err(ChatError::not_found("Prompt", query)),
    };

    match result {
        Ok(prompt) => render::print_info(&format!("Prompt: {}", prompt.name)),
        Err(e) => render::print_error(&e),
    }
}

fn print_help() {
    let rows = [
        ("<text>", "send a message"),
        ("/image <path>", "send an image file"),
        ("/prompt <name|id>", "select the prompt to use"),
        ("/prompts", "list prompts"),
        ("/new", "start a new conversation"),
        ("/list", "list conversations"),
        ("/switch <id>", "switch conversation"),
        ("/delete <id>", "delete a conversation"),
        ("/show", "reprint the current conversation"),
        ("/help", "show this help"),
        ("/quit", "leave"),
    ];
    for (command, description) in rows {
        println!("  {:<20} {}", command.bright_cyan(), description.bright_black());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent_verbatim() {
        assert_eq!(
            ReplCommand::parse("  hello there "),
            Some(ReplCommand::Send("  hello there ".to_string()))
        );
        assert_eq!(ReplCommand::parse("   "), None);
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(
            ReplCommand::parse("/image ./cat.png"),
            Some(ReplCommand::Image(Some(PathBuf::from("./cat.png"))))
        );
        assert_eq!(ReplCommand::parse("/image"), Some(ReplCommand::Image(None)));
        assert_eq!(
            ReplCommand::parse("/prompt Image Analysis"),
            Some(ReplCommand::SelectPrompt("Image Analysis".to_string()))
        );
        assert_eq!(ReplCommand::parse("/quit"), Some(ReplCommand::Quit));
        assert_eq!(
            ReplCommand::parse("/nope"),
            Some(ReplCommand::Unknown("/nope".to_string()))
        );
    }
}
