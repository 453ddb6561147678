use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::transport::UpstreamReply;

/// Handles agent requests that are not addressed to a registered agent.
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn process(&self, body: &Value) -> Result<UpstreamReply>;
}

/// Adapter for deployments that only talk to remote agents.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyAdapter;

#[async_trait]
impl ServiceAdapter for EmptyAdapter {
    fn name(&self) -> &str {
        "empty"
    }

    async fn process(&self, _body: &Value) -> Result<UpstreamReply> {
        Err(GatewayError::NoServiceAdapter)
    }
}
