use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Failures surfaced by the forwarders and the agent runtime.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a transport that is not backed by reqwest.
    #[error("upstream transport failed: {0}")]
    Transport(String),

    #[error("upstream returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid agent deployment URL {0}")]
    InvalidUrl(String),

    #[error("invalid thread id: {0:?}")]
    InvalidThreadId(String),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("request does not name an agent and no service adapter handles it")]
    NoServiceAdapter,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Network(_) | GatewayError::Transport(_) | GatewayError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UnknownAgent(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidThreadId(_) => StatusCode::BAD_REQUEST,
            GatewayError::NoServiceAdapter => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!("Request failed with {}: {}", status, self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            GatewayError::Transport("refused".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::UnknownAgent("ghost".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::InvalidThreadId("..".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::InvalidUrl("nope".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::NoServiceAdapter.status_code(),
            StatusCode::BAD_REQUEST
        );

        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(
            GatewayError::from(decode).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
