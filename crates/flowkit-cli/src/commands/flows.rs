//! Flows command handler

use crate::error::CliError;
use flowkit::FlowkitApp;

pub async fn run_flows(app: &FlowkitApp) -> Result<(), CliError> {
    println!("📋 Flows:");
    for flow in app.flows().list() {
        println!(
            "  {} - {} [{}]",
            flow.name,
            flow.description.as_deref().unwrap_or("no description"),
            flow.model.as_deref().unwrap_or("-")
        );
    }

    println!("\n🧠 Models:");
    for model in app.gateway().list_models() {
        println!("  {} ({})", model.name(), model.model_type());
    }

    Ok(())
}
