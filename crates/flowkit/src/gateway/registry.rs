use std::collections::HashMap;

use flowkit_core::{ConfigError, ModelReference, ModelType};
use tracing::{debug, warn};

/// Name-keyed set of models the gateway may call.
///
/// Populated during bootstrap and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelReference>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with the given type tag.
    ///
    /// Registering the same pair twice is a no-op. A different tag replaces the
    /// earlier registration.
    pub fn register(&mut self, name: &str, type_tag: &str) -> Result<ModelReference, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::new("model name cannot be empty"));
        }
        let model_type = ModelType::parse_tag(type_tag)?;
        let reference = ModelReference::new(name, model_type);

        match self.models.insert(name.to_string(), reference.clone()) {
            Some(previous) if previous.model_type() != model_type => {
                warn!(
                    model = name,
                    previous = %previous.model_type(),
                    current = %model_type,
                    "Model re-registered with a different type"
                );
            }
            Some(_) => {}
            None => debug!(model = name, model_type = %model_type, "Registered model"),
        }

        Ok(reference)
    }

    pub fn get(&self, name: &str) -> Option<ModelReference> {
        self.models.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// All registered models, sorted by name
    pub fn list(&self) -> Vec<ModelReference> {
        let mut models: Vec<ModelReference> = self.models.values().cloned().collect();
        models.sort_by(|a, b| a.name().cmp(b.name()));
        models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
