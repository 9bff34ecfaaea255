//! Flow trait and closure adapter for flowkit-core
//!
//! A flow is a named unit of application logic with one string input and one
//! string output. Flows are registered once at startup and invoked by an
//! external caller any number of times; each invocation is independent.

use crate::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Core trait for externally invokable units of work
#[async_trait]
pub trait Flow: Send + Sync {
    /// Run the flow on one input
    async fn run(&self, input: String) -> Result<String>;

    /// Optional method to get flow metadata
    fn metadata(&self) -> FlowMetadata {
        FlowMetadata::default()
    }
}

/// Metadata about a flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowMetadata {
    /// Description of what this flow does
    pub description: Option<String>,
    /// Model the flow generates with, if any
    pub model: Option<String>,
}

/// Arc-wrapped flow for thread-safe sharing
pub type SharedFlow = Arc<dyn Flow>;

/// A flow backed by an async closure
pub struct FnFlow<F> {
    handler: F,
    metadata: FlowMetadata,
}

impl<F> FnFlow<F> {
    /// Attach a description to the flow
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }
}

/// Wrap an async closure as a [`Flow`]
pub fn flow_fn<F, Fut>(handler: F) -> FnFlow<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    FnFlow {
        handler,
        metadata: FlowMetadata::default(),
    }
}

#[async_trait]
impl<F, Fut> Flow for FnFlow<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    async fn run(&self, input: String) -> Result<String> {
        (self.handler)(input).await
    }

    fn metadata(&self) -> FlowMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[tokio::test]
    async fn test_fn_flow_runs_closure() {
        let flow = flow_fn(|input: String| async move {
            Ok::<_, CoreError>(input.to_uppercase())
        })
        .describe("Uppercases its input");

        assert_eq!(flow.run("hello".to_string()).await.unwrap(), "HELLO");
        assert_eq!(
            flow.metadata().description.as_deref(),
            Some("Uppercases its input")
        );
    }

    #[tokio::test]
    async fn test_fn_flow_propagates_error() {
        let flow = flow_fn(|_input: String| async move {
            Err::<String, _>(CoreError::NotFound("model not found".to_string()))
        });

        let shared: SharedFlow = Arc::new(flow);
        let err = shared.run("x".to_string()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
