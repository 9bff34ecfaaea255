//! Init command handler

use crate::error::CliError;
use flowkit::FlowkitConfig;
use std::fs;
use std::path::Path;

pub async fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    println!("🚀 Initializing flowkit configuration...");

    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    let content = FlowkitConfig::default().to_toml()?;
    fs::write(path, content)
        .map_err(|e| CliError::InvalidInput(format!("Failed to write {}: {}", path.display(), e)))?;

    println!("📝 Wrote {}", path.display());
    println!("\nNext steps:");
    println!("  1. Pull the model: ollama pull qwen2:0.5b");
    println!(
        "  2. Run 'flowkit --config {} check' to verify the server",
        path.display()
    );
    println!("  3. Run 'flowkit run menuSuggestionFlow Italian'");

    Ok(())
}
