//! HTTP client for an Ollama inference server.

use async_trait::async_trait;
use flowkit_core::{
    ConfigError, GenerationBackend, GenerationError, GenerationRequest, GenerationResponse,
    ModelReference, ModelType,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::dto::{ChatRequest, ChatResponse, GenerateRequest, GenerateResponse};

/// Address of a locally running Ollama
pub const DEFAULT_SERVER_ADDRESS: &str = "http://127.0.0.1:11434";

/// Validate an inference server address.
///
/// The address must be an absolute `http` or `https` URL with a host. The
/// returned URL always ends in `/` so API paths can be joined onto it.
pub fn parse_server_address(address: &str) -> Result<Url, ConfigError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ConfigError::new("server address cannot be empty"));
    }

    let mut url = Url::parse(address)
        .map_err(|e| ConfigError::new(format!("invalid server address '{}': {}", address, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::new(format!(
            "server address '{}' must use http or https",
            address
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::new(format!(
            "server address '{}' has no host",
            address
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Generation backend talking to Ollama's REST API
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: Url,
}

impl OllamaBackend {
    /// Creates a client for `base_url`, bounding each call by `timeout` when set.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::new(format!("failed to build HTTP client: {}", e)))?;

        debug!(url = %base_url, ?timeout, "Created Ollama backend");

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GenerationError> {
        self.base_url
            .join(path)
            .map_err(|e| GenerationError::Network(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GenerationError>
    where
        B: serde::Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, path, "Ollama request failed");
                transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, path, "Ollama API error");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, path, "Failed to parse Ollama response");
            GenerationError::MalformedResponse(format!("Failed to parse JSON: {}", e))
        })
    }
}

fn transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout(e.to_string())
    } else {
        GenerationError::Network(e.to_string())
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn check(&self) -> Result<(), ConfigError> {
        let url = self
            .base_url
            .join("api/tags")
            .map_err(|e| ConfigError::new(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            ConfigError::new(format!(
                "Ollama server at {} is unreachable: {}",
                self.base_url, e
            ))
        })?;

        if !response.status().is_success() {
            return Err(ConfigError::new(format!(
                "Ollama server at {} answered {}",
                self.base_url,
                response.status()
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, model, request), fields(model = %model.name(), model_type = %model.model_type()))]
    async fn generate(
        &self,
        model: &ModelReference,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        debug!(message_count = request.messages.len(), "Sending request");

        let response: GenerationResponse = match model.model_type() {
            ModelType::Chat => {
                let body = ChatRequest::new(model.name(), request);
                self.post_json::<_, ChatResponse>("api/chat", &body)
                    .await?
                    .into()
            }
            ModelType::Generate => {
                let body = GenerateRequest::new(model.name(), request);
                self.post_json::<_, GenerateResponse>("api/generate", &body)
                    .await?
                    .into()
            }
        };

        debug!(
            finish_reason = ?response.finish_reason,
            chars = response.text.len(),
            "Received response"
        );
        Ok(response)
    }
}
