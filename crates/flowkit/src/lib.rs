//! Generative flows over a locally hosted Ollama server
//!
//! flowkit wires a model gateway (which knows how to reach the inference
//! server and which models it may call) to a registry of named flows. Each flow
//! takes one string, builds a generation request, calls the gateway and
//! returns the generated text.

pub mod app;
pub mod config;
pub mod error;
pub mod flows;
pub mod gateway;

// Re-export core types
pub use flowkit_core::{
    ConfigError, CoreError, Flow, FlowMetadata, GenerationBackend, GenerationConfig,
    GenerationError, GenerationRequest, GenerationResponse, Message, ModelReference, ModelType,
    RequestId, Result, Role, SharedBackend, SharedFlow, flow_fn,
};

pub use app::{AppMetadata, FlowkitApp, FlowkitAppBuilder};
pub use config::FlowkitConfig;
pub use error::{FlowkitError, Result as FlowkitResult};
pub use flows::{FlowRegistry, MENU_SUGGESTION_FLOW};
pub use gateway::ModelGateway;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::FlowkitApp;
    pub use crate::config::FlowkitConfig;
    pub use flowkit_core::{Flow, GenerationRequest, GenerationResponse};
}
