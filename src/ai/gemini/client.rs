use super::types::GenerateContentResponse;
use crate::ai::fallback::AttemptError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client; one call per candidate model.
pub struct GeminiHttpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new_with_client(base_url: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Calls `generateContent` on `model`, classifying failures for fallback.
    ///
    /// The key travels as the `key` query parameter, so reqwest errors are
    /// stripped of their URL before they reach logs or messages.
    pub async fn generate_content<Req: Serialize>(
        &self,
        model: &str,
        api_key: &str,
        request: &Req,
    ) -> std::result::Result<GenerateContentResponse, AttemptError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to send request to Gemini ({}): {}", model, e);
                AttemptError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Unavailable(e.without_url().to_string()))?;

        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse Gemini response (status {}): {}\nBody: {}",
                status,
                e,
                body
            );
            AttemptError::Unavailable(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(error) = &envelope.error {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!("Gemini API error (status {}): {}", status, message);
            return Err(AttemptError::from_vendor_message(message));
        }

        if !status.is_success() {
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(AttemptError::Fatal(format!(
                "Gemini API error (status {})",
                status
            )));
        }

        Ok(envelope)
    }
}
