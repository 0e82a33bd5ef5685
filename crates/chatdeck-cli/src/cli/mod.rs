//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chatdeck_core::{config, logging};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "chatdeck")]
#[command(version)]
#[command(about = "Terminal chat session manager")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the reply delay from config (milliseconds)
    #[arg(long, global = true, value_name = "MS")]
    latency_ms: Option<u64>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sends one message in a new session and prints the transcript
    Exec {
        /// The message text
        #[arg(short, long, required_unless_present = "image")]
        prompt: Option<String>,

        /// Attach an image file to the message
        #[arg(short, long, value_name = "PATH")]
        image: Option<PathBuf>,

        /// Print the session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lists the suggested prompts shown on the landing view
    Prompts,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;
    if let Some(ms) = cli.latency_ms {
        config.reply_latency_ms = ms;
    }

    // default to chat mode
    let Some(command) = cli.command else {
        let _guard = logging::init(&config.logging).context("init logging")?;
        return commands::chat::run(&config).await;
    };

    match command {
        Commands::Exec {
            prompt,
            image,
            json,
        } => {
            let _guard = logging::init(&config.logging).context("init logging")?;
            commands::exec::run(commands::exec::ExecRunOptions {
                prompt: prompt.as_deref().unwrap_or_default(),
                image: image.as_deref(),
                json,
                config: &config,
            })
            .await
        }
        Commands::Prompts => {
            commands::prompts::list(&config);
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
