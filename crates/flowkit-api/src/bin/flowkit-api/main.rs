use clap::Parser;
use flowkit::{FlowkitApp, FlowkitConfig};
use flowkit_api::{AppState, build_app};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// flowkit flow server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, env = "FLOWKIT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FLOWKIT_PORT")]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "FLOWKIT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Config file path (.toml or .json)
    #[arg(short, long, env = "FLOWKIT_CONFIG")]
    config_file: Option<PathBuf>,

    /// Ollama server address
    #[arg(long, env = "FLOWKIT_OLLAMA_ADDRESS")]
    ollama_address: Option<String>,

    /// Disable Swagger UI
    #[arg(long, env = "FLOWKIT_DISABLE_SWAGGER", default_value_t = false)]
    disable_swagger: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration. A config file that was asked for must load.
    let mut config = match &cli.config_file {
        Some(path) => FlowkitConfig::load_from_file(path).map_err(|e| {
            anyhow::anyhow!("Failed to load config file {}: {}", path.display(), e)
        })?,
        None => FlowkitConfig::default(),
    };

    // Override with CLI options
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(address) = cli.ollama_address {
        config.ollama.server_address = address;
    }
    if cli.disable_swagger {
        config.server.enable_swagger = false;
    }

    // Initialize logging
    let filter = format!(
        "flowkit={level},flowkit_api={level},tower_http=debug",
        level = config.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = &cli.config_file {
        info!("Configuration loaded from: {}", path.display());
    }

    let addr = config.server.socket_addr()?;

    // Bootstrap gateway and flows
    let app = FlowkitApp::from_config(&config).await?;
    info!(
        "Ollama server: {} ({} model(s), {} flow(s))",
        config.ollama.server_address,
        app.gateway().list_models().len(),
        app.flows().len()
    );

    let state = AppState::new(Arc::new(app), config.server.clone());
    let router = build_app(state);

    // Start server
    info!("Starting server on: {}", addr);
    if config.server.enable_swagger {
        info!("Swagger UI: http://{}/swagger-ui", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
