use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::{FlowkitError, Result};
use crate::flows::{DEFAULT_MENU_MODEL, DuplicateFlowPolicy};
use crate::gateway::DEFAULT_SERVER_ADDRESS;

/// flowkit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowkitConfig {
    /// Inference server settings
    pub ollama: OllamaConfig,

    /// Models to register at startup. They must already exist on the server.
    pub models: Vec<ModelDefinition>,

    /// Built-in flow settings
    pub flows: FlowsConfig,

    /// Flow server settings
    pub server: ServerConfig,

    /// Log level
    pub log_level: String,
}

impl Default for FlowkitConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            models: vec![ModelDefinition::new(DEFAULT_MENU_MODEL, "chat")],
            flows: FlowsConfig::default(),
            server: ServerConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl FlowkitConfig {
    /// Load from configuration file. `.toml` files are parsed as TOML, anything else as JSON.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&content).map_err(|e| FlowkitError::ConfigParse(e.to_string()))
        } else {
            serde_json::from_str(&content).map_err(|e| FlowkitError::ConfigParse(e.to_string()))
        }
    }

    /// Render as TOML, used by `flowkit init`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FlowkitError::ConfigParse(e.to_string()))
    }
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL of the Ollama API, e.g. "http://127.0.0.1:11434"
    pub server_address: String,

    /// Upper bound for one generation call. Unbounded when unset.
    pub request_timeout_secs: Option<u64>,

    /// Probe the server during startup instead of at first generation
    pub check_on_startup: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            request_timeout_secs: None,
            check_on_startup: false,
        }
    }
}

impl OllamaConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// A (model name, type tag) pair to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>, model_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_type: model_type.into(),
        }
    }
}

/// Built-in flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowsConfig {
    /// Model used by menuSuggestionFlow
    pub menu_model: String,

    /// What to do when a flow name is defined twice
    pub duplicate_policy: DuplicateFlowPolicy,
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            menu_model: DEFAULT_MENU_MODEL.to_string(),
            duplicate_policy: DuplicateFlowPolicy::default(),
        }
    }
}

/// Flow server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,

    /// Port number
    pub port: u16,

    /// Enable Swagger UI
    pub enable_swagger: bool,

    /// CORS configuration
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
            enable_swagger: true,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Convert to SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = if self.host == "localhost" {
            "127.0.0.1"
        } else {
            self.host.as_str()
        };
        let addr = format!("{}:{}", host, self.port);
        addr.parse().map_err(|e| {
            FlowkitError::Config(flowkit_core::ConfigError::new(format!(
                "Invalid address {}: {}",
                addr, e
            )))
        })
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins
    pub allowed_origins: Vec<String>,

    /// Allow any origin
    pub allow_any_origin: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_any_origin: true, // development server
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_local_setup() {
        let config = FlowkitConfig::default();
        assert_eq!(config.ollama.server_address, "http://127.0.0.1:11434");
        assert_eq!(config.models, vec![ModelDefinition::new("qwen2:0.5b", "chat")]);
        assert_eq!(config.flows.menu_model, "qwen2:0.5b");
        assert_eq!(config.server.socket_addr().unwrap().port(), 9090);
        assert!(config.ollama.request_timeout().is_none());
    }

    #[test]
    fn test_localhost_resolves() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn test_load_toml_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[ollama]
server_address = "http://gpu-box:11434"
request_timeout_secs = 30

[[models]]
name = "gemma2"
type = "CHAT"

[flows]
menu_model = "gemma2"
duplicate_policy = "reject"
"#
        )
        .unwrap();

        let config = FlowkitConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.ollama.server_address, "http://gpu-box:11434");
        assert_eq!(config.ollama.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.models, vec![ModelDefinition::new("gemma2", "CHAT")]);
        assert_eq!(config.flows.duplicate_policy, DuplicateFlowPolicy::Reject);
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"server": {{"port": 8080, "enable_swagger": false}}}}"#).unwrap();

        let config = FlowkitConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.enable_swagger);
        assert_eq!(config.flows.menu_model, "qwen2:0.5b");
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();

        let err = FlowkitConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, FlowkitError::ConfigParse(_)));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let rendered = FlowkitConfig::default().to_toml().unwrap();
        let parsed: FlowkitConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.models, FlowkitConfig::default().models);
    }
}
