//! Chat-completion transport

use crate::config::LlmConfig;
use async_trait::async_trait;
use serde::Deserialize;
use spamcheck_core::{ChatRequest, ChatResponse, Error, Result};
use std::time::Duration;

/// Sends one chat-completion request
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `request` authenticated with `api_key`
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// OpenAI-compatible client for the Groq API
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GroqClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.completions_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for GroqClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(url = %self.url, model = %request.model, "Sending chat completion");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::external(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::external(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(Error::external(format!(
                "API returned {}: {}",
                status, detail
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::external(format!("Malformed completion response: {}", e)))
    }

    fn name(&self) -> &str {
        "groq"
    }
}
