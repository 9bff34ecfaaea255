//! Model references resolved by the gateway

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::ConfigError;

/// Kind of endpoint a model is served from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModelType {
    /// Multi-message chat endpoint
    Chat,
    /// Single-prompt completion endpoint
    Generate,
}

impl ModelType {
    /// Parse a type tag such as `"chat"` or `"CHAT"`
    pub fn parse_tag(tag: &str) -> Result<Self, ConfigError> {
        Self::from_str(tag.trim())
            .map_err(|_| ConfigError::new(format!("unknown model type '{}'", tag)))
    }
}

/// A registered generation-capable model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelReference {
    name: String,
    model_type: ModelType,
}

impl ModelReference {
    pub fn new(name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            name: name.into(),
            model_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }
}
