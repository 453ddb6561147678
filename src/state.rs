use std::sync::Arc;

use crate::agent_runtime::{AgentRuntime, EmptyAdapter};
use crate::config::Config;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::upstream_service::{Endpoints, UpstreamServiceClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<UpstreamServiceClient>,
    pub runtime: Arc<AgentRuntime>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Build the state around one shared transport (and its connection pool).
    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let upstream = Arc::new(UpstreamServiceClient::new(
            transport.clone(),
            Endpoints::from_config(&config.upstream),
        ));
        let runtime = Arc::new(AgentRuntime::from_config(
            &config,
            Arc::new(EmptyAdapter),
            transport,
        ));

        Self {
            config: Arc::new(config),
            upstream,
            runtime,
        }
    }
}
