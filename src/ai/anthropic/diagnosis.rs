use super::client::AnthropicHttpClient;
use super::types::{ImageSource, Message, MessagesRequest, RequestBlock};
use crate::ai::{DiagnosisService, VendorEnvelope};
use crate::models::{EncodedImage, Provider};
use crate::{prompts, Result};
use async_trait::async_trait;
use std::time::Duration;

const MAX_TOKENS: u32 = 1000;

/// Anthropic diagnosis client: one model, one endpoint, no fallback.
pub struct AnthropicDiagnosisClient {
    http: AnthropicHttpClient,
    model: String,
}

impl AnthropicDiagnosisClient {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(base_url, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        base_url: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: AnthropicHttpClient::new_with_client(base_url, timeout, client),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, image: &EncodedImage) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    RequestBlock::Image {
                        source: ImageSource::Base64 {
                            media_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    RequestBlock::Text {
                        text: prompts::DIAGNOSIS.to_string(),
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl DiagnosisService for AnthropicDiagnosisClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn request_diagnosis(
        &self,
        api_key: &str,
        image: &EncodedImage,
    ) -> Result<VendorEnvelope> {
        tracing::debug!(
            "Requesting Anthropic diagnosis from {} ({} base64 chars, {})",
            self.model,
            image.data.len(),
            image.mime_type
        );

        let request = self.build_request(image);
        let response = self.http.messages(api_key, &request).await?;

        Ok(VendorEnvelope::Anthropic(response))
    }
}
