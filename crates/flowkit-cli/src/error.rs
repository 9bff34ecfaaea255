//! Error types for flowkit-cli

use flowkit::{ConfigError, CoreError, FlowkitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Flowkit(#[from] FlowkitError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
