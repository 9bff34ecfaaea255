//! CLI command handlers

use crate::error::CliError;
use flowkit::gateway::EchoBackend;
use flowkit::{FlowkitApp, FlowkitConfig};
use std::path::Path;
use std::sync::Arc;

pub mod chat;
pub mod check;
pub mod flows;
pub mod init;
pub mod run;

pub use chat::run_chat;
pub use check::run_check;
pub use flows::run_flows;
pub use init::run_init;
pub use run::run_run;

/// Load the config file when given, then apply the address override
pub fn load_config(
    config_file: Option<&Path>,
    ollama_address: Option<String>,
) -> Result<FlowkitConfig, CliError> {
    let mut config = match config_file {
        Some(path) => FlowkitConfig::load_from_file(path)?,
        None => FlowkitConfig::default(),
    };

    if let Some(address) = ollama_address {
        config.ollama.server_address = address;
    }

    Ok(config)
}

/// Build the application, generating through Ollama or, with `echo`, locally
pub async fn build_app(config: &FlowkitConfig, echo: bool) -> Result<FlowkitApp, CliError> {
    if !echo {
        return Ok(FlowkitApp::from_config(config).await?);
    }

    let app = FlowkitApp::builder("flowkit")
        .backend(Arc::new(EchoBackend))
        .models_from(config)
        .flows_config(config.flows.clone())
        .build()?;
    Ok(app)
}
