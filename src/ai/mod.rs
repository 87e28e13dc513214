//! Vision-model integration for plant diagnosis
//!
//! Each vendor implements [`DiagnosisService`]: it turns an encoded photo into
//! that vendor's response envelope. Text extraction from the envelope is
//! per vendor too, so the rest of the pipeline never looks at vendor JSON.

pub mod anthropic;
pub mod fallback;
pub mod gemini;
pub mod mime;
pub mod mock;

pub use anthropic::AnthropicDiagnosisClient;
pub use gemini::GeminiDiagnosisClient;
pub use mock::{MockDiagnosisClient, MockReply};

use crate::models::{EncodedImage, Provider};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

#[async_trait]
pub trait DiagnosisService: Send + Sync {
    fn provider(&self) -> Provider;

    /// Send the diagnosis prompt and image, returning the raw envelope.
    async fn request_diagnosis(&self, api_key: &str, image: &EncodedImage)
        -> Result<VendorEnvelope>;
}

/// Raw response from whichever vendor answered.
#[derive(Debug, Clone)]
pub enum VendorEnvelope {
    Anthropic(anthropic::types::MessagesResponse),
    Gemini(gemini::types::GenerateContentResponse),
}

impl VendorEnvelope {
    /// First text-bearing content part, if any.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            VendorEnvelope::Anthropic(response) => response.first_text(),
            VendorEnvelope::Gemini(response) => response.first_text(),
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            VendorEnvelope::Anthropic(_) => Provider::Anthropic,
            VendorEnvelope::Gemini(_) => Provider::Gemini,
        }
    }
}

/// `error` object both vendors put in failed responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Treat an explicit JSON `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<VendorError>,
}

/// Pull `error.message` out of a vendor error body, if it has one.
pub(crate) fn vendor_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .and_then(|error| error.message)
}
