//! Check command handler

use crate::error::CliError;
use flowkit::FlowkitConfig;
use flowkit::gateway::{GatewayOptions, ModelGateway};

/// Probe the configured Ollama server and report the registered models
pub async fn run_check(config: &FlowkitConfig) -> Result<(), CliError> {
    println!("🔍 Checking {}...", config.ollama.server_address);

    let mut options = GatewayOptions::from(&config.ollama);
    options.check_on_startup = true;

    let mut gateway = ModelGateway::with_options(options);
    gateway.configure(&config.ollama.server_address).await?;

    println!("✅ Server reachable");
    for model in &config.models {
        gateway.register_model(&model.name, &model.model_type)?;
        println!("   {} ({})", model.name, model.model_type);
    }

    Ok(())
}
