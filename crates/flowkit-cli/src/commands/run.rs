//! Run command handler

use crate::error::CliError;
use flowkit::FlowkitApp;

/// Run one flow and print its result
pub async fn run_run(app: &FlowkitApp, flow: &str, input: String) -> Result<(), CliError> {
    let result = app.run_flow(flow, input).await?;
    println!("{}", result);
    Ok(())
}
