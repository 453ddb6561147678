use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::Result;
use crate::transport::{join_url, HttpTransport};

/// Inbound body for `/api/transcribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionRequest {
    pub audio_url: String,
}

/// Inbound body for `/api/tts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
struct TranscribePayload<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Serialize)]
struct SpeechPayload<'a> {
    text: &'a str,
}

/// Fully resolved upstream addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub transcribe_url: String,
    pub speech_url: String,
    pub health_url: String,
}

impl Endpoints {
    pub fn from_config(upstream: &UpstreamConfig) -> Self {
        Self {
            base_url: upstream.base_url.clone(),
            transcribe_url: join_url(&upstream.base_url, &upstream.transcribe_path),
            speech_url: join_url(&upstream.base_url, &upstream.speech_path),
            health_url: join_url(&upstream.base_url, "/ok"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}

/// Relay `{"audio_url": audio_url}` to the transcription endpoint and return
/// the upstream JSON unmodified, whatever its status.
pub async fn transcribe_audio(
    transport: &dyn HttpTransport,
    endpoints: &Endpoints,
    audio_url: &str,
) -> Result<Value> {
    let body = serde_json::to_value(TranscribePayload { audio_url })?;
    let reply = transport
        .post_json(&endpoints.transcribe_url, &[], &body)
        .await?;
    debug!("Transcription upstream answered {}", reply.status);
    reply.json()
}

/// Relay `{"text": text}` to the speech endpoint and return the upstream JSON
/// unmodified, whatever its status.
pub async fn text_to_speech(
    transport: &dyn HttpTransport,
    endpoints: &Endpoints,
    text: &str,
) -> Result<Value> {
    let body = serde_json::to_value(SpeechPayload { text })?;
    let reply = transport.post_json(&endpoints.speech_url, &[], &body).await?;
    debug!("Speech upstream answered {}", reply.status);
    reply.json()
}

/// Client for the speech service sitting next to the agent deployment.
#[derive(Clone)]
pub struct UpstreamServiceClient {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl UpstreamServiceClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn transcribe(&self, request: &TranscriptionRequest) -> Result<Value> {
        transcribe_audio(self.transport.as_ref(), &self.endpoints, &request.audio_url).await
    }

    pub async fn speak(&self, request: &SpeechRequest) -> Result<Value> {
        text_to_speech(self.transport.as_ref(), &self.endpoints, &request.text).await
    }

    pub async fn health_check(&self) -> Result<bool> {
        let reply = self.transport.get(&self.endpoints.health_url).await?;
        Ok(reply.is_success())
    }
}
