//! Gemini `generateContent` payload types.

use crate::ai::{null_as_default, VendorError};
use serde::{Deserialize, Serialize};

/// Gemini content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

/// Untagged union of content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding: anything that is
/// neither text nor inline media lands in `Other` instead of failing the
/// whole envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

/// Base64 inline payload used for image requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: Option<GenerationConfig>,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<VendorError>,
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Envelope holding a single text answer.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part::Text { text: text.into() }],
                }),
            }],
            error: None,
        }
    }

    /// First text part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| {
                content.parts.iter().find_map(|part| match part {
                    Part::Text { text } => Some(text.as_str()),
                    Part::InlineData { .. } | Part::Other(_) => None,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_text_skips_non_text_parts() {
        let response = parse(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                        { "functionCall": { "name": "noop" } },
                        { "text": 7 },
                        { "text": "{\"image_quality\":\"clear\"}" },
                        { "text": "second" }
                    ]
                },
                "finishReason": "STOP"
            }]
        }));

        assert_eq!(response.first_text(), Some("{\"image_quality\":\"clear\"}"));
    }

    #[test]
    fn test_first_text_only_looks_at_first_candidate() {
        let response = parse(serde_json::json!({
            "candidates": [
                { "content": { "parts": [] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }));

        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_missing_levels_yield_none() {
        assert_eq!(parse(serde_json::json!({})).first_text(), None);
        assert_eq!(
            parse(serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] })).first_text(),
            None
        );
        assert_eq!(
            parse(serde_json::json!({ "candidates": [{ "content": {} }] })).first_text(),
            None
        );
    }

    #[test]
    fn test_error_envelope() {
        let response = parse(serde_json::json!({
            "error": { "code": 404, "message": "models/x is not found", "status": "NOT_FOUND" }
        }));

        let error = response.error.unwrap();
        assert_eq!(error.message.as_deref(), Some("models/x is not found"));
    }

    #[test]
    fn test_null_levels_decode_as_empty() {
        assert_eq!(
            parse(serde_json::json!({ "candidates": null })).first_text(),
            None
        );
        assert_eq!(
            parse(serde_json::json!({
                "candidates": [{ "content": { "role": "model", "parts": null } }]
            }))
            .first_text(),
            None
        );
        assert_eq!(
            parse(serde_json::json!({ "candidates": [{ "content": null }], "error": null }))
                .first_text(),
            None
        );
    }

    #[test]
    fn test_request_serializes_camel_case_inline_data() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/jpeg".to_string(),
                        data: "AAAA".to_string(),
                    },
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }
}
