use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::state::AppState;
use crate::upstream_service::{SpeechRequest, TranscriptionRequest};

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let endpoint = state.config.server.endpoint.clone();

    Router::new()
        // Agent runtime
        .route(&endpoint, post(agent_request))
        .route(&format!("{}/info", endpoint.trim_end_matches('/')), get(agent_info))

        // Speech service forwarders
        .route("/api/transcribe", post(transcribe_audio))
        .route("/api/tts", post(text_to_speech))

        .route("/api/health", get(health_check))
}

async fn agent_request(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), GatewayError> {
    let reply = state.runtime.handle_request(&body).await?;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.json()?)))
}

async fn agent_info(State(state): State<AppState>) -> Json<Value> {
    let agents: Vec<Value> = state
        .runtime
        .agents()
        .map(|agent| json!(agent))
        .collect();
    Json(json!({ "agents": agents }))
}

async fn transcribe_audio(
    State(state): State<AppState>,
    Json(request): Json<TranscriptionRequest>,
) -> Result<Json<Value>, GatewayError> {
    Ok(Json(state.upstream.transcribe(&request).await?))
}

async fn text_to_speech(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<Value>, GatewayError> {
    Ok(Json(state.upstream.speak(&request).await?))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let upstream_healthy = state.upstream.health_check().await.unwrap_or(false);
    Json(json!({
        "status": "ok",
        "upstream": upstream_healthy
    }))
}
