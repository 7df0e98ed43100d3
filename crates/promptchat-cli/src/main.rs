use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod bootstrap;
mod commands;
mod logging;

use bootstrap::AppContext;
use commands::conversations::ConversationsAction;
use commands::prompts::PromptsAction;

#[derive(Parser)]
#[command(name = "promptchat", version)]
#[command(about = "Chat with a simulated assistant using reusable prompts", long_about = None)]
struct Cli {
    /// Path to config.toml (default: <config dir>/promptchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for stored records and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage prompts
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },
    /// Manage conversations
    Conversations {
        #[command(subcommand)]
        action: ConversationsAction,
    },
    /// Start an interactive chat in the current conversation
    Chat {
        /// Prompt to select on start (name or id)
        #[arg(long)]
        prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref())?;
    let paths = bootstrap::resolve_paths(&config, cli.data_dir.as_deref());
    let _log_guard = logging::init(&paths.logs_dir()?, &config.logging.level, cli.verbose)?;

    let mut context = AppContext::build(&config, paths)?;
    context.controller.startup();

    match cli.command {
        Commands::Prompts { action } => commands::prompts::run(&context, action)?,
        Commands::Conversations { action } => commands::conversations::run(&mut context, action)?,
        Commands::Chat { prompt } => commands::chat::run(&mut context, prompt).await?,
    }

    Ok(())
}
