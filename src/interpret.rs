//! Response interpretation: vendor envelope in, [`AnalysisOutcome`] out.
//!
//! Model text is untrusted input. Every malformed answer maps to an outcome;
//! nothing here returns an error or panics.

use crate::ai::VendorEnvelope;
use crate::models::{AnalysisOutcome, DiagnosisRecord, FailureReason};
use serde_json::Value;

const UNCLEAR: &str = "unclear";

pub fn interpret(envelope: &VendorEnvelope) -> AnalysisOutcome {
    let Some(text) = envelope.first_text() else {
        tracing::warn!("{} response has no text content", envelope.provider());
        return AnalysisOutcome::Failure(FailureReason::NoTextContent);
    };

    interpret_text(text)
}

/// Classify the model's raw answer text.
pub fn interpret_text(text: &str) -> AnalysisOutcome {
    let cleaned = strip_code_fence(text);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Model answer is not valid JSON: {}", e);
            return malformed(e.to_string());
        }
    };

    let Value::Object(fields) = value else {
        return malformed("expected a JSON object".to_string());
    };

    // Gate before typed decoding: unclear answers often leave other fields
    // null or half-filled.
    if fields.get("image_quality").and_then(Value::as_str) == Some(UNCLEAR) {
        tracing::info!("Model reported unclear image");
        return AnalysisOutcome::UnclearImage;
    }

    match serde_json::from_value::<DiagnosisRecord>(Value::Object(fields)) {
        Ok(record) => AnalysisOutcome::Success(record),
        Err(e) => {
            tracing::warn!("Model answer does not match the diagnosis shape: {}", e);
            malformed(e.to_string())
        }
    }
}

fn malformed(detail: String) -> AnalysisOutcome {
    AnalysisOutcome::Failure(FailureReason::MalformedJson(detail))
}

/// Remove a surrounding markdown fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fence(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}
