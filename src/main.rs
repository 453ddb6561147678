use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent_bridge::{app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("agent_bridge=debug,tower_http=debug")),
        )
        .init();

    let config = Config::discover()?;
    info!(
        "Upstream at {}, {} agent(s) registered",
        config.upstream.base_url,
        config.agents.len()
    );

    let addr = (config.server.host.clone(), config.server.port);
    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
