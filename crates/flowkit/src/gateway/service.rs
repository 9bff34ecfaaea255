use std::sync::Arc;
use std::time::Duration;

use flowkit_core::{
    ConfigError, GenerationBackend, GenerationError, GenerationRequest, GenerationResponse,
    ModelReference, SharedBackend,
};
use tracing::{info, instrument, warn};

use super::{ModelRegistry, OllamaBackend, parse_server_address};
use crate::config::OllamaConfig;

/// Knobs applied when [`ModelGateway::configure`] builds the Ollama backend
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    pub request_timeout: Option<Duration>,
    pub check_on_startup: bool,
}

impl From<&OllamaConfig> for GatewayOptions {
    fn from(config: &OllamaConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            check_on_startup: config.check_on_startup,
        }
    }
}

/// Reaches the generation backend and resolves registered model names.
///
/// Configuration and registration take `&mut self` and happen during
/// bootstrap; afterwards the gateway is shared behind an `Arc` and only read.
#[derive(Clone, Default)]
pub struct ModelGateway {
    backend: Option<SharedBackend>,
    registry: ModelRegistry,
    options: GatewayOptions,
}

impl ModelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GatewayOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Gateway over an already constructed backend
    pub fn with_backend(backend: SharedBackend) -> Self {
        Self {
            backend: Some(backend),
            ..Default::default()
        }
    }

    /// Validate `server_address` and point the gateway at the Ollama server there.
    ///
    /// Connectivity is only probed when `check_on_startup` is set; otherwise
    /// network failures surface from [`generate`](Self::generate).
    pub async fn configure(&mut self, server_address: &str) -> Result<(), ConfigError> {
        let url = parse_server_address(server_address)?;
        let backend = OllamaBackend::new(url, self.options.request_timeout)?;

        if self.options.check_on_startup {
            backend.check().await?;
            info!(url = %backend.base_url(), "Ollama server reachable");
        }

        info!(url = %backend.base_url(), "Configured Ollama backend");
        self.backend = Some(Arc::new(backend));
        Ok(())
    }

    /// Replace the backend, e.g. with an in-process one
    pub fn set_backend(&mut self, backend: SharedBackend) {
        self.backend = Some(backend);
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// Probe the configured backend
    pub async fn check(&self) -> Result<(), ConfigError> {
        match &self.backend {
            Some(backend) => backend.check().await,
            None => Err(ConfigError::new("no backend configured")),
        }
    }

    pub fn register_model(&mut self, name: &str, type_tag: &str) -> Result<(), ConfigError> {
        self.registry.register(name, type_tag).map(|_| ())
    }

    pub fn lookup(&self, name: &str) -> Option<ModelReference> {
        self.registry.get(name)
    }

    pub fn list_models(&self) -> Vec<ModelReference> {
        self.registry.list()
    }

    /// One call to the backend for `model`. No retry.
    #[instrument(skip(self, model, request), fields(model = %model.name()))]
    pub async fn generate(
        &self,
        model: &ModelReference,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            warn!("generate called before the gateway was configured");
            GenerationError::NotConfigured
        })?;
        backend.generate(model, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{EchoBackend, FailingBackend};
    use flowkit_core::{GenerationConfig, ModelType};

    #[tokio::test]
    async fn test_configure_accepts_valid_address_without_probe() {
        let mut gateway = ModelGateway::new();
        // nothing listens here; no probe is made without check_on_startup
        gateway.configure("http://127.0.0.1:9").await.unwrap();
        assert!(gateway.is_configured());
        assert_eq!(gateway.backend_name(), Some("ollama"));
    }

    #[tokio::test]
    async fn test_configure_rejects_bad_addresses() {
        let mut gateway = ModelGateway::new();
        assert!(gateway.configure("").await.is_err());
        assert!(gateway.configure("not a url").await.is_err());
        assert!(!gateway.is_configured());
    }

    #[tokio::test]
    async fn test_configure_with_probe_fails_when_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut gateway = ModelGateway::with_options(GatewayOptions {
            request_timeout: Some(Duration::from_secs(2)),
            check_on_startup: true,
        });
        let err = gateway
            .configure(&format!("http://{}", addr))
            .await
            .unwrap_err();
        assert!(err.0.contains("unreachable"));
        assert!(!gateway.is_configured());
    }

    #[tokio::test]
    async fn test_lookup_matches_registration() {
        let mut gateway = ModelGateway::new();
        gateway.register_model("qwen2:0.5b", "CHAT").unwrap();
        gateway.register_model("llama3", "generate").unwrap();

        assert_eq!(
            gateway.lookup("qwen2:0.5b").unwrap().model_type(),
            ModelType::Chat
        );
        assert_eq!(
            gateway.lookup("llama3").unwrap().model_type(),
            ModelType::Generate
        );
        assert!(gateway.lookup("qwen2:05b").is_none());
        assert_eq!(gateway.list_models().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_before_configure_fails() {
        let gateway = ModelGateway::new();
        let model = ModelReference::new("qwen2:0.5b", ModelType::Chat);
        let request = GenerationRequest::user_text(GenerationConfig::default(), "hi");

        let err = gateway.generate(&model, &request).await.unwrap_err();
        assert_eq!(err, GenerationError::NotConfigured);
    }

    #[tokio::test]
    async fn test_generate_uses_backend() {
        let mut gateway = ModelGateway::with_backend(Arc::new(EchoBackend));
        gateway.register_model("qwen2:0.5b", "chat").unwrap();
        let model = gateway.lookup("qwen2:0.5b").unwrap();
        let request = GenerationRequest::user_text(GenerationConfig::default(), "hello");

        let response = gateway.generate(&model, &request).await.unwrap();
        assert_eq!(response.text(), "[qwen2:0.5b] hello");
    }

    #[tokio::test]
    async fn test_generate_propagates_backend_error() {
        let gateway = ModelGateway::with_backend(Arc::new(FailingBackend::new(
            GenerationError::Status {
                status: 500,
                body: "boom".to_string(),
            },
        )));
        let model = ModelReference::new("qwen2:0.5b", ModelType::Chat);
        let request = GenerationRequest::user_text(GenerationConfig::default(), "hello");

        let err = gateway.generate(&model, &request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 500, .. }));
    }
}
