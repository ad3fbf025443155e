mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::handlers;

#[derive(Parser)]
#[command(name = "confirm")]
#[command(version)]
#[command(about = "Yes/No confirmation prompts for Discord channels")]
#[command(
    help_template = "{name} - {version}\n{about}\n\n{usage-heading}\n  {usage}\n\n{all-args}{options}\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a confirmation prompt and wait for the user to answer
    ///
    /// The prompt is an embed with ✅ and ❌ buttons. Only the given user can
    /// answer; the buttons are removed once an answer arrives or the timeout
    /// elapses.
    ///
    /// Exit status is 0 when confirmed, non-zero when declined or timed out.
    ///
    /// JSON Response Format (with --json):
    ///   {"outcome": "confirmed", "confirmed": true, "channel_id": "...", "message_id": "..."}
    ///   "confirmed" is null on timeout.
    ///
    /// Examples:
    ///   confirm ask "Deploy to production?" --channel 381870553235193857 --user 80351110224678912
    ///   confirm ask "Drop table users?" -c 3818... -u 8035... --timeout 60 --color "#e74c3c"
    Ask {
        /// Prompt text
        text: String,

        /// Channel id to post the prompt into
        #[arg(short, long)]
        channel: String,

        /// Id of the user allowed to answer
        #[arg(short, long)]
        user: String,

        /// Seconds to wait for an answer (default from config, 20)
        #[arg(short, long)]
        timeout: Option<u32>,

        /// Embed color as hex, e.g. "#2ecc71"
        #[arg(long)]
        color: Option<String>,

        /// Leave the user out of the embed author line
        #[arg(long)]
        hide_author: bool,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Configure bot token and prompt defaults
    Config {
        /// Start interactive configuration setup
        #[arg(long)]
        init: bool,

        /// Print the effective configuration (token masked)
        #[arg(long)]
        show: bool,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            text,
            channel,
            user,
            timeout,
            color,
            hide_author,
            config_file,
            json,
        } => {
            handlers::handle_ask(handlers::AskArgs {
                text,
                channel,
                user,
                timeout,
                color,
                hide_author,
                config_file,
                json,
            })
            .await?;
        }
        Commands::Config {
            init,
            show,
            config_file,
        } => {
            if init {
                handlers::handle_config_init(config_file)?;
            } else if show {
                handlers::handle_config_show(config_file)?;
            } else {
                println!("Config command requires --init or --show");
                println!("Usage: confirm config --init|--show [--config-file PATH]");
            }
        }
    }

    Ok(())
}
