//! Application bootstrap for flowkit
//!
//! Builds the model gateway and the flow registry once at startup. The
//! resulting [`FlowkitApp`] is read-only and cheap to share between request
//! handlers.

use flowkit_core::{Result as CoreResult, SharedBackend, SharedFlow};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{FlowkitConfig, FlowsConfig};
use crate::error::Result;
use crate::flows::{FlowRegistry, MENU_SUGGESTION_FLOW, MenuSuggestionFlow};
use crate::gateway::{GatewayOptions, ModelGateway};

/// The main flowkit application
pub struct FlowkitApp {
    gateway: Arc<ModelGateway>,
    flows: Arc<FlowRegistry>,
    metadata: AppMetadata,
}

/// Metadata about the flowkit application
#[derive(Debug, Clone)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
}

impl FlowkitApp {
    /// Configure the Ollama backend, register the configured models and the
    /// built-in flows. Any configuration error aborts startup.
    pub async fn from_config(config: &FlowkitConfig) -> Result<Self> {
        let mut gateway = ModelGateway::with_options(GatewayOptions::from(&config.ollama));
        gateway.configure(&config.ollama.server_address).await?;

        Self::builder("flowkit")
            .gateway(gateway)
            .models_from(config)
            .flows_config(config.flows.clone())
            .build()
    }

    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> FlowkitAppBuilder {
        FlowkitAppBuilder::new(name)
    }

    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    pub fn flows(&self) -> &Arc<FlowRegistry> {
        &self.flows
    }

    /// Get app metadata
    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    /// Invoke a registered flow by name
    pub async fn run_flow(&self, name: &str, input: impl Into<String>) -> CoreResult<String> {
        self.flows.run(name, input).await
    }
}

/// Builder for creating flowkit applications
pub struct FlowkitAppBuilder {
    name: String,
    version: String,
    gateway: ModelGateway,
    models: Vec<(String, String)>,
    flows_config: FlowsConfig,
    extra_flows: Vec<(String, SharedFlow)>,
}

impl FlowkitAppBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            gateway: ModelGateway::new(),
            models: Vec::new(),
            flows_config: FlowsConfig::default(),
            extra_flows: Vec::new(),
        }
    }

    /// Set the version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Use an already configured gateway
    pub fn gateway(mut self, gateway: ModelGateway) -> Self {
        self.gateway = gateway;
        self
    }

    /// Generate through `backend` instead of an Ollama server
    pub fn backend(mut self, backend: SharedBackend) -> Self {
        self.gateway.set_backend(backend);
        self
    }

    /// Register a model with its type tag
    pub fn model(mut self, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        self.models.push((name.into(), type_tag.into()));
        self
    }

    /// Register every model listed in `config`
    pub fn models_from(mut self, config: &FlowkitConfig) -> Self {
        self.models.extend(
            config
                .models
                .iter()
                .map(|m| (m.name.clone(), m.model_type.clone())),
        );
        self
    }

    pub fn flows_config(mut self, flows_config: FlowsConfig) -> Self {
        self.flows_config = flows_config;
        self
    }

    /// Define an additional flow next to the built-in ones
    pub fn flow(mut self, name: impl Into<String>, flow: SharedFlow) -> Self {
        self.extra_flows.push((name.into(), flow));
        self
    }

    /// Build the application
    pub fn build(self) -> Result<FlowkitApp> {
        let mut gateway = self.gateway;
        for (name, type_tag) in &self.models {
            gateway.register_model(name, type_tag)?;
        }

        if gateway.lookup(&self.flows_config.menu_model).is_none() {
            warn!(
                model = %self.flows_config.menu_model,
                "Model used by {} is not registered; invocations will fail",
                MENU_SUGGESTION_FLOW
            );
        }

        let gateway = Arc::new(gateway);

        let mut flows = FlowRegistry::with_policy(self.flows_config.duplicate_policy);
        flows.define_flow(
            MENU_SUGGESTION_FLOW,
            MenuSuggestionFlow::new(Arc::clone(&gateway), &self.flows_config.menu_model),
        )?;
        for (name, flow) in self.extra_flows {
            flows.define_shared(name, flow)?;
        }

        info!(
            models = gateway.list_models().len(),
            flows = flows.len(),
            backend = gateway.backend_name().unwrap_or("none"),
            "Application ready"
        );

        Ok(FlowkitApp {
            gateway,
            flows: Arc::new(flows),
            metadata: AppMetadata {
                name: self.name,
                version: self.version,
            },
        })
    }
}
