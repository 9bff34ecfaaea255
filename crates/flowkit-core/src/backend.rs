//! Seam between the model gateway and a concrete inference server

use async_trait::async_trait;
use std::sync::Arc;

use crate::{ConfigError, GenerationError, GenerationRequest, GenerationResponse, ModelReference};

/// A remote (or in-process) text generation service
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Verify the backend is reachable. Backends without a cheap probe succeed.
    async fn check(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Perform one generation call for `model`
    async fn generate(
        &self,
        model: &ModelReference,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}

/// Arc-wrapped backend for thread-safe sharing
pub type SharedBackend = Arc<dyn GenerationBackend>;
