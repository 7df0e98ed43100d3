//! Terminal rendering shared by the subcommands.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use promptchat_core::ChatError;
use promptchat_core::conversation::{Conversation, Message, MessageKind, Sender};
use promptchat_core::prompt::Prompt;

/// Characters of prompt content shown in listings.
const CONTENT_PREVIEW_CHARS: usize = 60;

/// Width of the short id shown in listings.
const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}

fn local_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn preview(text: &str) -> String {
    let single_line = text.replace('\n', " ");
    let mut chars = single_line.chars();
    let head: String = chars.by_ref().take(CONTENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub fn prompt_line(prompt: &Prompt, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    format!(
        "{} {}  {}  {}",
        marker.bright_green(),
        short_id(&prompt.id).bright_black(),
        prompt.name.bold(),
        preview(&prompt.content).bright_black()
    )
}

pub fn conversation_line(conversation: &Conversation, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{} {}  {}  {}  {}",
        marker.bright_green(),
        short_id(&conversation.id).bright_black(),
        conversation.title.bold(),
        format!("({} messages)", conversation.messages.len()).bright_black(),
        local_time(conversation.updated_at).bright_black()
    )
}

pub fn print_message(message: &Message) {
    let time = local_time(message.timestamp);
    match message.sender {
        Sender::User => {
            let prompt = message
                .prompt_used
                .as_deref()
                .map(|name| format!(" [{name}]"))
                .unwrap_or_default();
            println!("{}", format!("you{prompt} {time}").green().bold());
            if message.kind == MessageKind::Image
                && let Some(url) = &message.image_url
            {
                println!("{}", url.bright_black());
            }
            for line in message.content.lines() {
                println!("{}", line.green());
            }
        }
        Sender::Assistant => {
            println!("{}", format!("assistant {time}").bright_blue().bold());
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
    println!();
}

pub fn print_conversation(conversation: &Conversation) {
    println!("{}", conversation.title.bright_magenta().bold());
    println!(
        "{}",
        format!(
            "{}  created {}",
            conversation.id,
            local_time(conversation.created_at)
        )
        .bright_black()
    );
    println!();

    if conversation.is_empty() {
        println!("{}", "No messages yet.".bright_black());
        return;
    }
    for message in &conversation.messages {
        print_message(message);
    }
}

pub fn print_info(text: &str) {
    println!("{}", text.bright_black());
}

/// Validation refusals are expected and shown softly; anything else is an error.
pub fn print_error(error: &ChatError) {
    match error.as_validation() {
        Some(refusal) => println!("{}", refusal.to_string().yellow()),
        None => eprintln!("{}", error.to_string().red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_preview_flattens_and_truncates() {
        assert_eq!(preview("a\nb"), "a b");
        let long = "y".repeat(70);
        assert_eq!(preview(&long), format!("{}...", "y".repeat(60)));
    }
}
