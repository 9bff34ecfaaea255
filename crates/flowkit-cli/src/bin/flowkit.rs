//! CLI for flowkit

use clap::Parser;
use flowkit::MENU_SUGGESTION_FLOW;
use flowkit_cli::{commands, error::CliError};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flowkit")]
#[command(about = "Run generative flows against a local Ollama server", long_about = None)]
struct Cli {
    /// Config file path (.toml or .json)
    #[arg(short, long, global = true, env = "FLOWKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Ollama server address
    #[arg(long, global = true, env = "FLOWKIT_OLLAMA_ADDRESS")]
    ollama_address: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, env = "FLOWKIT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(default_value = "flowkit.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
    /// Run a flow once and print the result
    Run {
        /// Flow name
        flow: String,
        /// Flow input
        input: String,
        /// Generate with the local echo backend instead of Ollama
        #[arg(long)]
        echo: bool,
    },
    /// Run a flow for each line read from the terminal
    Chat {
        /// Flow name
        #[arg(long, short, default_value = MENU_SUGGESTION_FLOW)]
        flow: String,
        /// Optional initial message
        #[arg(long, short)]
        message: Option<String>,
        /// Run once and exit (non-interactive mode)
        #[arg(long)]
        once: bool,
        /// Generate with the local echo backend instead of Ollama
        #[arg(long)]
        echo: bool,
    },
    /// Check that the Ollama server is reachable
    Check,
    /// List flows and models
    Flows,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    // Logs go to stderr so flow output stays pipeable
    let filter = format!("flowkit={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = cli.command else {
        println!("flowkit - generative flows over Ollama");
        println!("Use --help for more information");
        return Ok(());
    };

    let load_config = || commands::load_config(cli.config.as_deref(), cli.ollama_address.clone());

    match command {
        Commands::Init { path, force } => {
            commands::run_init(&path, force).await?;
        }
        Commands::Run { flow, input, echo } => {
            let app = commands::build_app(&load_config()?, echo).await?;
            commands::run_run(&app, &flow, input).await?;
        }
        Commands::Chat {
            flow,
            message,
            once,
            echo,
        } => {
            let app = commands::build_app(&load_config()?, echo).await?;
            commands::run_chat(&app, &flow, message, once).await?;
        }
        Commands::Check => {
            commands::run_check(&load_config()?).await?;
        }
        Commands::Flows => {
            let app = commands::build_app(&load_config()?, false).await?;
            commands::run_flows(&app).await?;
        }
    }

    Ok(())
}
