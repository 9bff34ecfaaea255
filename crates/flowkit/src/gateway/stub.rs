//! In-process backends for offline runs and tests.

use async_trait::async_trait;
use flowkit_core::{
    GenerationBackend, GenerationError, GenerationRequest, GenerationResponse, ModelReference,
};

/// Replies with the last user message, prefixed with the model name
#[derive(Debug, Clone, Default)]
pub struct EchoBackend;

#[async_trait]
impl GenerationBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(
        &self,
        model: &ModelReference,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let text = request.last_user_text().unwrap_or_default();
        Ok(GenerationResponse::simple(
            model.name(),
            format!("[{}] {}", model.name(), text),
        ))
    }
}

/// Always replies with the same text
#[derive(Debug, Clone)]
pub struct StaticBackend {
    text: String,
}

impl StaticBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl GenerationBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(
        &self,
        model: &ModelReference,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        Ok(GenerationResponse::simple(model.name(), self.text.clone()))
    }
}

/// Always fails with the configured error
#[derive(Debug, Clone)]
pub struct FailingBackend {
    error: GenerationError,
}

impl FailingBackend {
    pub fn new(error: GenerationError) -> Self {
        Self { error }
    }

    /// Simulates a refused connection
    pub fn network() -> Self {
        Self::new(GenerationError::Network("connection refused".to_string()))
    }
}

#[async_trait]
impl GenerationBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _model: &ModelReference,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        Err(self.error.clone())
    }
}
