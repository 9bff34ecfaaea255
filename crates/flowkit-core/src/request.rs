//! Generation request and response types for flowkit-core

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, Result};

/// NewType pattern for Request ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new RequestId
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Model,
}

/// One role-tagged message of a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }
}

/// Sampling parameters common to every backend. Unset fields are left to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Vec<String>,
}

impl GenerationConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Default::default()
        }
    }
}

/// Payload of one call to a generation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub config: GenerationConfig,
    pub messages: Vec<Message>,
}

impl GenerationRequest {
    /// Build a request; at least one message is required.
    pub fn new(config: GenerationConfig, messages: impl IntoIterator<Item = Message>) -> Result<Self> {
        let messages: Vec<Message> = messages.into_iter().collect();
        if messages.is_empty() {
            return Err(CoreError::InvalidRequest(
                "a generation request needs at least one message".to_string(),
            ));
        }
        Ok(Self { config, messages })
    }

    /// Request consisting of a single user message
    pub fn user_text(config: GenerationConfig, text: impl Into<String>) -> Self {
        Self {
            config,
            messages: vec![Message::user(text)],
        }
    }

    /// Concatenated content of the system messages, if any
    pub fn system_prompt(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    /// Content of the last user message
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Token accounting reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// Result of a generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl GenerationResponse {
    /// Create a simple response
    pub fn simple(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            finish_reason: None,
            usage: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_a_message() {
        let result = GenerationRequest::new(GenerationConfig::default(), Vec::new());
        assert!(matches!(result, Err(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn test_system_prompt_and_last_user_text() {
        let request = GenerationRequest::new(
            GenerationConfig::with_temperature(0.2),
            vec![
                Message::system("Be brief."),
                Message::user("first"),
                Message::model("reply"),
                Message::user("second"),
            ],
        )
        .unwrap();

        assert_eq!(request.system_prompt().as_deref(), Some("Be brief."));
        assert_eq!(request.last_user_text(), Some("second"));
        assert_eq!(request.config.temperature, Some(0.2));
    }

    #[test]
    fn test_user_text_has_no_system_prompt() {
        let request = GenerationRequest::user_text(GenerationConfig::default(), "hi");
        assert_eq!(request.messages, vec![Message::user("hi")]);
        assert!(request.system_prompt().is_none());
    }
}
