//! Error types for flowkit crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowkitError {
    #[error("Core error: {0}")]
    Core(#[from] flowkit_core::CoreError),

    #[error(transparent)]
    Config(#[from] flowkit_core::ConfigError),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, FlowkitError>;
