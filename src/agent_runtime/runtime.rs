use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::langgraph::LangGraphAgent;
use super::service_adapter::ServiceAdapter;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::transport::{HttpTransport, UpstreamReply};

/// Routes agent requests to remote graphs, falling back to a service adapter.
pub struct AgentRuntime {
    agents: BTreeMap<String, LangGraphAgent>,
    adapter: Arc<dyn ServiceAdapter>,
    transport: Arc<dyn HttpTransport>,
}

impl AgentRuntime {
    pub fn new(
        agents: impl IntoIterator<Item = LangGraphAgent>,
        adapter: Arc<dyn ServiceAdapter>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let agents = agents
            .into_iter()
            .map(|agent| (agent.name.clone(), agent))
            .collect();
        Self {
            agents,
            adapter,
            transport,
        }
    }

    pub fn from_config(
        config: &Config,
        adapter: Arc<dyn ServiceAdapter>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let agents = config
            .agents
            .iter()
            .map(|agent| LangGraphAgent::from_config(agent, &config.upstream));
        Self::new(agents, adapter, transport)
    }

    /// Registered agents, ordered by name.
    pub fn agents(&self) -> impl Iterator<Item = &LangGraphAgent> {
        self.agents.values()
    }

    pub fn agent(&self, name: &str) -> Option<&LangGraphAgent> {
        self.agents.get(name)
    }

    pub async fn handle_request(&self, body: &Value) -> Result<UpstreamReply> {
        match body.get("agentName").and_then(|v| v.as_str()) {
            Some(name) => {
                let agent = self
                    .agent(name)
                    .ok_or_else(|| GatewayError::UnknownAgent(name.to_string()))?;
                agent.run(self.transport.as_ref(), body).await
            }
            None => match (self.agents.len(), self.agents.values().next()) {
                (1, Some(agent)) => agent.run(self.transport.as_ref(), body).await,
                _ => {
                    debug!(
                        "No agent named in request, delegating to {} adapter",
                        self.adapter.name()
                    );
                    self.adapter.process(body).await
                }
            },
        }
    }
}
