use super::types::{MessagesRequest, MessagesResponse};
use crate::ai::vendor_error_message;
use crate::error::RequestError;
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicHttpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

fn transport(message: String) -> Error {
    RequestError::Transport {
        provider: "Anthropic",
        message,
    }
    .into()
}

impl AnthropicHttpClient {
    pub fn new_with_client(base_url: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Single `POST /v1/messages`; every failure is a transport error.
    pub async fn messages(&self, api_key: &str, request: &MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Anthropic: {}", e);
                transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("Anthropic API error (status {}): {}", status, body);
            let detail = vendor_error_message(&body).unwrap_or(body);
            return Err(transport(format!("API error (status {}): {}", status, detail)));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Anthropic response: {}\nBody: {}", e, body);
            transport(format!("Failed to parse Anthropic response: {}", e))
        })
    }
}
