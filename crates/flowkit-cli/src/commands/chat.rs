//! Chat command handler

use crate::error::CliError;
use flowkit::FlowkitApp;
use rustyline::DefaultEditor;

/// Feed each input line to `flow` and print the result
pub async fn run_chat(
    app: &FlowkitApp,
    flow: &str,
    initial_message: Option<String>,
    once: bool,
) -> Result<(), CliError> {
    if !app.flows().contains(flow) {
        return Err(CliError::InvalidInput(format!(
            "Flow '{}' not found. Use 'flowkit flows' to see available flows.",
            flow
        )));
    }

    // Only show header in interactive mode
    if !once {
        println!("🍽️  flowkit chat ({}) - Type 'exit' to quit", flow);
        println!("================================");
    }

    if let Some(msg) = initial_message {
        if !once {
            println!("You: {}", msg);
        }
        let result = app.run_flow(flow, msg).await?;

        if once {
            println!("{}", result);
            return Ok(());
        }
        println!("Bot: {}", result);
    } else if once {
        return Err(CliError::InvalidInput(
            "Message is required in once mode".to_string(),
        ));
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("🍽️  > ") {
            Ok(line) => {
                let input = line.trim();

                if input == "exit" || input == "quit" {
                    println!("Goodbye! 👋");
                    break;
                }

                if input.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                // A failed invocation leaves the session usable
                match app.run_flow(flow, input).await {
                    Ok(result) => println!("Bot: {}", result),
                    Err(e) => println!("❌ {}", e),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("\nCtrl-C received. Use 'exit' to quit.");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("\nGoodbye! 👋");
                break;
            }
            Err(err) => {
                return Err(err.into());
            }
        }
    }

    Ok(())
}
