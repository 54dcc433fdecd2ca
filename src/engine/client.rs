// src/engine/client.rs

//! Transport used by an instance to submit a finished attempt.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::models::payload::{AttemptPayload, SubmitResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(
        &self,
        endpoint: &Url,
        token: &str,
        payload: &AttemptPayload,
    ) -> Result<SubmitResponse, TransportError>;
}

/// Posts the payload as JSON with the session token as a bearer credential.
/// No timeout beyond the client default is applied.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn submit(
        &self,
        endpoint: &Url,
        token: &str,
        payload: &AttemptPayload,
    ) -> Result<SubmitResponse, TransportError> {
        let response = self
            .client
            .post(endpoint.clone())
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<SubmitResponse>(&body)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }
}
