//! `menuSuggestionFlow`: asks a model for a dish matching a restaurant theme.

use std::sync::Arc;

use async_trait::async_trait;
use flowkit_core::{
    CoreError, Flow, FlowMetadata, GenerationConfig, GenerationRequest, Result,
};
use tracing::instrument;

use crate::gateway::ModelGateway;

pub const MENU_SUGGESTION_FLOW: &str = "menuSuggestionFlow";

/// Model the flow uses unless configured otherwise. Must already be pulled on the server.
pub const DEFAULT_MENU_MODEL: &str = "qwen2:0.5b";

pub const MENU_TEMPERATURE: f32 = 1.0;

/// Prompt sent for a restaurant theme
pub fn menu_prompt(theme: &str) -> String {
    format!("Suggest an item for the menu of a {} themed restaurant", theme)
}

/// Generation request sent for a restaurant theme
pub fn menu_request(theme: &str) -> GenerationRequest {
    GenerationRequest::user_text(
        GenerationConfig::with_temperature(MENU_TEMPERATURE),
        menu_prompt(theme),
    )
}

pub struct MenuSuggestionFlow {
    gateway: Arc<ModelGateway>,
    model_name: String,
}

impl MenuSuggestionFlow {
    pub fn new(gateway: Arc<ModelGateway>, model_name: impl Into<String>) -> Self {
        Self {
            gateway,
            model_name: model_name.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl Flow for MenuSuggestionFlow {
    #[instrument(skip(self), fields(model = %self.model_name))]
    async fn run(&self, input: String) -> Result<String> {
        let model = self.gateway.lookup(&self.model_name).ok_or_else(|| {
            CoreError::NotFound(format!("model not found: {}", self.model_name))
        })?;

        let response = self.gateway.generate(&model, &menu_request(&input)).await?;
        Ok(response.into_text())
    }

    fn metadata(&self) -> FlowMetadata {
        FlowMetadata {
            description: Some("Suggests a menu item for a themed restaurant".to_string()),
            model: Some(self.model_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{EchoBackend, FailingBackend, StaticBackend};
    use flowkit_core::{GenerationError, Message, SharedBackend};

    fn gateway_with(backend: SharedBackend) -> Arc<ModelGateway> {
        let mut gateway = ModelGateway::with_backend(backend);
        gateway.register_model(DEFAULT_MENU_MODEL, "chat").unwrap();
        Arc::new(gateway)
    }

    #[test]
    fn test_prompt_substitutes_theme() {
        assert_eq!(
            menu_prompt("Italian"),
            "Suggest an item for the menu of a Italian themed restaurant"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = menu_request("Italian");
        assert_eq!(request.config.temperature, Some(1.0));
        assert_eq!(
            request.messages,
            vec![Message::user(
                "Suggest an item for the menu of a Italian themed restaurant"
            )]
        );
    }

    #[tokio::test]
    async fn test_returns_backend_text() {
        let flow = MenuSuggestionFlow::new(
            gateway_with(Arc::new(StaticBackend::new("Margherita Pizza"))),
            DEFAULT_MENU_MODEL,
        );

        for theme in ["Italian", "pirate", ""] {
            assert_eq!(flow.run(theme.to_string()).await.unwrap(), "Margherita Pizza");
        }
    }

    #[tokio::test]
    async fn test_missing_model_is_not_found() {
        let flow = MenuSuggestionFlow::new(
            gateway_with(Arc::new(StaticBackend::new("unused"))),
            "qwen2:7b",
        );

        let err = flow.run("Italian".to_string()).await.unwrap_err();
        match err {
            CoreError::NotFound(msg) => assert!(msg.contains("model not found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_backend_failure_is_generation_error() {
        let flow = MenuSuggestionFlow::new(
            gateway_with(Arc::new(FailingBackend::network())),
            DEFAULT_MENU_MODEL,
        );

        let err = flow.run("Italian".to_string()).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Generation(GenerationError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_invocations_do_not_cross() {
        let flow = Arc::new(MenuSuggestionFlow::new(
            gateway_with(Arc::new(EchoBackend)),
            DEFAULT_MENU_MODEL,
        ));

        let themes = ["Italian", "Thai", "Mexican", "Nordic"];
        let handles: Vec<_> = themes
            .iter()
            .map(|theme| {
                let flow = Arc::clone(&flow);
                let theme = theme.to_string();
                tokio::spawn(async move { flow.run(theme).await })
            })
            .collect();

        for (theme, handle) in themes.iter().zip(handles) {
            let output = handle.await.unwrap().unwrap();
            assert_eq!(
                output,
                format!("[{}] {}", DEFAULT_MENU_MODEL, menu_prompt(theme))
            );
        }
    }
}
