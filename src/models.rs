//! Data models and structures
//!
//! Defines the per-scan values that flow through the pipeline: the raw image,
//! its encoded form, the parsed diagnosis, and the final outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Gemini,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Gemini",
        }
    }

    /// Environment variable holding this vendor's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(format!(
                "Unknown provider '{}'. Expected 'gemini' or 'anthropic'",
                other
            )),
        }
    }
}

/// A photo handed over by a file picker or camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Base64 (standard alphabet, padded) image ready for a vendor payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

/// Treatment recommendation shared by the organic and chemical slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    #[serde(default)]
    pub pesticide: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
}

/// Diagnosis as returned by the model.
///
/// Every field is optional because the model is only asked, not forced, to
/// follow the schema. Unknown keys are kept in `extra`, so no value the
/// model sent is lost. Serializing writes absent known fields as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    #[serde(default)]
    pub pest_name: Option<String>,
    #[serde(default)]
    pub disease_name: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub organic_solution: Option<Treatment>,
    #[serde(default)]
    pub chemical_solution: Option<Treatment>,
    #[serde(default)]
    pub prevention: Option<Vec<String>>,
    #[serde(default)]
    pub image_quality: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The vendor envelope held no text part.
    NoTextContent,
    /// The text was not a JSON object of the expected shape.
    MalformedJson(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoTextContent => f.write_str("no text content in response"),
            FailureReason::MalformedJson(detail) => write!(f, "malformed JSON: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(DiagnosisRecord),
    UnclearImage,
    Failure(FailureReason),
}
