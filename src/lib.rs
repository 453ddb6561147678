//! HTTP gateway between a web front end and a hosted LangGraph agent runtime,
//! plus forwarders for the speech service running beside it.

pub mod agent_runtime;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod transport;
pub mod upstream_service;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use error::GatewayError;
pub use state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
