use std::collections::HashMap;
use std::sync::Arc;

use flowkit_core::{ConfigError, CoreError, Flow, RequestId, Result, SharedFlow};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{Instrument, debug, info_span, warn};

/// What `define_flow` does when the name is already taken
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DuplicateFlowPolicy {
    /// Replace the earlier definition and log a warning
    #[default]
    Overwrite,
    /// Refuse the new definition
    Reject,
}

/// Name and description of a registered flow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowInfo {
    pub name: String,
    pub description: Option<String>,
    pub model: Option<String>,
}

/// Name-keyed set of invokable flows
#[derive(Clone, Default)]
pub struct FlowRegistry {
    flows: HashMap<String, SharedFlow>,
    policy: DuplicateFlowPolicy,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicateFlowPolicy) -> Self {
        Self {
            flows: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicateFlowPolicy {
        self.policy
    }

    /// Register `flow` under `name`
    pub fn define_flow(&mut self, name: impl Into<String>, flow: impl Flow + 'static) -> Result<()> {
        self.define_shared(name, Arc::new(flow))
    }

    /// Register an already shared flow under `name`
    pub fn define_shared(&mut self, name: impl Into<String>, flow: SharedFlow) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::new("flow name cannot be empty").into());
        }

        if self.flows.contains_key(&name) {
            match self.policy {
                DuplicateFlowPolicy::Reject => {
                    return Err(ConfigError::new(format!("flow '{}' is already defined", name))
                        .into());
                }
                DuplicateFlowPolicy::Overwrite => {
                    warn!(flow = %name, "Flow redefined; replacing previous definition");
                }
            }
        } else {
            debug!(flow = %name, "Defined flow");
        }

        self.flows.insert(name, flow);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SharedFlow> {
        self.flows.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    /// Registered flows, sorted by name
    pub fn list(&self) -> Vec<FlowInfo> {
        let mut flows: Vec<FlowInfo> = self
            .flows
            .iter()
            .map(|(name, flow)| {
                let metadata = flow.metadata();
                FlowInfo {
                    name: name.clone(),
                    description: metadata.description,
                    model: metadata.model,
                }
            })
            .collect();
        flows.sort_by(|a, b| a.name.cmp(&b.name));
        flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Invoke the flow registered under `name`
    pub async fn run(&self, name: &str, input: impl Into<String>) -> Result<String> {
        let flow = self
            .get(name)
            .ok_or_else(|| CoreError::NotFound(format!("flow '{}'", name)))?;

        let request_id = RequestId::new();
        let span = info_span!("flow", flow = %name, request_id = %request_id);

        async move {
            debug!("Running flow");
            let result = flow.run(input.into()).await;
            match &result {
                Ok(output) => debug!(chars = output.len(), "Flow succeeded"),
                Err(e) => warn!(error = %e, "Flow failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
