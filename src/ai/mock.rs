use super::gemini::types::GenerateContentResponse;
use super::{DiagnosisService, VendorEnvelope};
use crate::error::RequestError;
use crate::models::{EncodedImage, Provider};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DEFAULT_DIAGNOSIS: &str = r#"{"pest_name":null,"disease_name":null,"severity":"Low","symptoms":[],"cause":null,"organic_solution":null,"chemical_solution":null,"prevention":["water at the base","rotate crops","inspect weekly"],"image_quality":"clear"}"#;

/// Scripted reply for [`MockDiagnosisClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Envelope whose first text part is this string.
    Text(String),
    /// Envelope with no text part at all.
    Empty,
    Error(RequestError),
}

/// In-memory [`DiagnosisService`] that replays scripted replies in order,
/// cycling when it runs out.
#[derive(Clone)]
pub struct MockDiagnosisClient {
    provider: Provider,
    replies: Arc<Mutex<Vec<MockReply>>>,
    delays: Arc<Mutex<Vec<Duration>>>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<(String, EncodedImage)>>>,
}

impl MockDiagnosisClient {
    pub fn new() -> Self {
        Self {
            provider: Provider::Gemini,
            replies: Arc::new(Mutex::new(Vec::new())),
            delays: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(text.into()))
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    /// Delay applied to the n-th call (by order of addition).
    pub fn with_delay(self, delay: Duration) -> Self {
        self.delays.lock().unwrap().push(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// API key and image from the most recent call.
    pub fn last_request(&self) -> Option<(String, EncodedImage)> {
        self.last_request.lock().unwrap().clone()
    }

    fn envelope(&self, text: Option<String>) -> VendorEnvelope {
        match (self.provider, text) {
            (Provider::Gemini, Some(text)) => {
                VendorEnvelope::Gemini(GenerateContentResponse::from_text(text))
            }
            (Provider::Gemini, None) => VendorEnvelope::Gemini(GenerateContentResponse::default()),
            (Provider::Anthropic, Some(text)) => VendorEnvelope::Anthropic(
                super::anthropic::types::MessagesResponse::from_text(text),
            ),
            (Provider::Anthropic, None) => {
                VendorEnvelope::Anthropic(super::anthropic::types::MessagesResponse::default())
            }
        }
    }
}

impl Default for MockDiagnosisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagnosisService for MockDiagnosisClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn request_diagnosis(
        &self,
        api_key: &str,
        image: &EncodedImage,
    ) -> Result<VendorEnvelope> {
        let (reply, delay) = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            let index = *count - 1;

            *self.last_request.lock().unwrap() = Some((api_key.to_string(), image.clone()));

            let replies = self.replies.lock().unwrap();
            let reply = if replies.is_empty() {
                MockReply::Text(DEFAULT_DIAGNOSIS.to_string())
            } else {
                replies[index % replies.len()].clone()
            };
            let delay = self.delays.lock().unwrap().get(index).copied();
            (reply, delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(self.envelope(Some(text))),
            MockReply::Empty => Ok(self.envelope(None)),
            MockReply::Error(error) => Err(error.into()),
        }
    }
}
