//! Taleweaver CLI: the main entry point.
//!
//! Commands:
//! - `trim`:     Trim a conversation log to a token budget
//! - `estimate`: Show token estimates for a text or a log
//! - `replay`:   Replay a log through a budgeted history window
//! - `config`:   Show, initialize or validate configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod input;

#[derive(Parser)]
#[command(
    name = "taleweaver",
    about = "Taleweaver: chat history trimming against a token budget",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.taleweaver/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trim a conversation log (JSON) to the newest messages that fit a budget
    Trim {
        /// Token budget (defaults to history.max_tokens)
        #[arg(short, long, allow_negative_numbers = true)]
        max_tokens: Option<i64>,

        /// Read the log from a file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print a summary of kept and dropped messages to stderr
        #[arg(long)]
        stats: bool,

        /// Pretty-print the trimmed log
        #[arg(long)]
        pretty: bool,
    },

    /// Show token estimates
    Estimate {
        /// Estimate a single text instead of a log
        #[arg(short, long)]
        text: Option<String>,

        /// Read the log from a file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Characters shown per message line (defaults to debug.preview_chars)
        #[arg(long)]
        preview_chars: Option<usize>,
    },

    /// Replay a log message by message through a budgeted window
    Replay {
        /// Token budget (defaults to history.max_tokens)
        #[arg(short, long, allow_negative_numbers = true)]
        max_tokens: Option<i64>,

        /// Read the log from a file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration as TOML
    Init,
    /// Validate the configuration file and environment overrides
    Validate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays machine-readable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Trim {
            max_tokens,
            input,
            stats,
            pretty,
        } => {
            let config = commands::config_cmd::load(config_path)?;
            commands::trim::run(&config, input.as_deref(), max_tokens, stats, pretty)?
        }
        Commands::Estimate {
            text,
            input,
            preview_chars,
        } => {
            let config = commands::config_cmd::load(config_path)?;
            commands::estimate::run(&config, text.as_deref(), input.as_deref(), preview_chars)?
        }
        Commands::Replay { max_tokens, input } => {
            let config = commands::config_cmd::load(config_path)?;
            commands::replay::run(&config, input.as_deref(), max_tokens)?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path)?,
            ConfigAction::Init => commands::config_cmd::init(),
            ConfigAction::Validate => commands::config_cmd::validate(config_path)?,
        },
    }

    Ok(())
}
