use reqwest::Url;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{AgentConfig, UpstreamConfig};
use crate::error::{GatewayError, Result};
use crate::transport::{HttpTransport, UpstreamReply};

/// A graph hosted on a LangGraph deployment.
#[derive(Debug, Clone, Serialize)]
pub struct LangGraphAgent {
    pub name: String,
    pub graph_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    deployment_url: String,
    #[serde(skip)]
    langsmith_api_key: String,
}

impl LangGraphAgent {
    pub fn new(
        name: impl Into<String>,
        deployment_url: impl Into<String>,
        graph_id: impl Into<String>,
        langsmith_api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            graph_id: graph_id.into(),
            description: None,
            deployment_url: deployment_url.into(),
            langsmith_api_key: langsmith_api_key.into(),
        }
    }

    pub fn from_config(agent: &AgentConfig, upstream: &UpstreamConfig) -> Self {
        Self {
            description: agent.description.clone(),
            ..Self::new(
                agent.name.clone(),
                agent.deployment_url(upstream),
                agent.graph_id.clone(),
                agent.langsmith_api_key.clone(),
            )
        }
    }

    pub fn deployment_url(&self) -> &str {
        &self.deployment_url
    }

    /// Stateless runs go to `/runs/wait`; a `threadId` pins the run to a thread.
    /// The thread id is appended as one percent-encoded path segment.
    fn run_url(&self, body: &Value) -> Result<String> {
        let mut url = Url::parse(&self.deployment_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", self.deployment_url, e)))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GatewayError::InvalidUrl(format!("{}: cannot be a base", self.deployment_url))
            })?;
            segments.pop_if_empty();

            if let Some(thread_id) = body.get("threadId").and_then(|v| v.as_str()) {
                // Dot segments would be dropped or resolved by the URL parser.
                if thread_id.is_empty() || thread_id == "." || thread_id == ".." {
                    return Err(GatewayError::InvalidThreadId(thread_id.to_string()));
                }
                segments.extend(["threads", thread_id]);
            }
            segments.extend(["runs", "wait"]);
        }

        Ok(url.into())
    }

    /// Submit `body` to the graph and wait for the run's output.
    pub async fn run(&self, transport: &dyn HttpTransport, body: &Value) -> Result<UpstreamReply> {
        let run_id = Uuid::new_v4();
        let url = self.run_url(body)?;
        let input = body.get("input").cloned().unwrap_or_else(|| body.clone());
        let payload = json!({
            "assistant_id": self.graph_id,
            "input": input,
        });

        let mut headers = Vec::new();
        if !self.langsmith_api_key.is_empty() {
            headers.push(("X-Api-Key", self.langsmith_api_key.as_str()));
        }

        info!(%run_id, agent = %self.name, "Forwarding agent request to {}", url);
        let reply = transport.post_json(&url, &headers, &payload).await?;
        debug!(%run_id, status = reply.status, "Agent run finished");
        Ok(reply)
    }
}
