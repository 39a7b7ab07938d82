// Handles communication with the workflow generation API

use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PING_PATH: &str = "/api/ping";
pub const GENERATE_PATH: &str = "/api/generate";

/// Body value of `status` once the backend can take generation requests.
pub const READY_SENTINEL: &str = "ready";

pub const QUOTA_FALLBACK_MESSAGE: &str =
    "OpenAI API quota exceeded. Please check your billing settings.";
pub const RATE_LIMIT_FALLBACK_MESSAGE: &str =
    "Rate limit exceeded. Please wait before trying again.";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PingResponse {
    pub status: String,
}

impl PingResponse {
    pub fn is_ready(&self) -> bool {
        self.status == READY_SENTINEL
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    async fn ping(&self) -> Result<PingResponse, BackendError>;

    /// Generate a workflow. The decoded JSON body is returned untouched.
    async fn generate(&self, prompt: &str) -> Result<Value, BackendError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl WorkflowBackend for HttpBackend {
    async fn ping(&self) -> Result<PingResponse, BackendError> {
        let response = self
            .client
            .get(self.endpoint(PING_PATH))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: format!("HTTP error! status: {}", status.as_u16()),
            });
        }

        Ok(response.json::<PingResponse>().await?)
    }

    async fn generate(&self, prompt: &str) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.endpoint(GENERATE_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&GenerateRequest { message: prompt })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), %message, "generation rejected");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Pick the user-facing message for a failed generation response: the body's
/// `message`, then its `error`, then a status-specific fallback.
pub fn error_message(status: u16, body: &str) -> String {
    let generic = || format!("HTTP error! status: {}", status);

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .message
            .filter(|m| !m.is_empty())
            .or(parsed.error.filter(|e| !e.is_empty()))
            .unwrap_or_else(generic),
        Err(_) => match status {
            402 => QUOTA_FALLBACK_MESSAGE.to_string(),
            429 => RATE_LIMIT_FALLBACK_MESSAGE.to_string(),
            _ => generic(),
        },
    }
}
