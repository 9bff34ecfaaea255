//! Model gateway: reaches the inference server and resolves model names.

pub mod dto;
pub mod ollama;
pub mod registry;
pub mod service;
pub mod stub;

pub use ollama::{DEFAULT_SERVER_ADDRESS, OllamaBackend, parse_server_address};
pub use registry::ModelRegistry;
pub use service::{GatewayOptions, ModelGateway};
pub use stub::{EchoBackend, FailingBackend, StaticBackend};
