//! Ordered model fallback.
//!
//! Vendors retire model ids without notice, so a request walks a short list of
//! candidates. Only "this model does not exist here" style failures move on
//! to the next candidate; anything else (bad key, quota, malformed request)
//! ends the walk immediately.

use crate::error::RequestError;
use crate::Result;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// How a single candidate attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Model unknown/unsupported, transport failure, or unreadable body.
    Unavailable(String),
    /// The vendor gave a definitive answer; other candidates would fail too.
    Fatal(String),
}

impl AttemptError {
    /// Classify a vendor `error.message`.
    pub fn from_vendor_message(message: String) -> Self {
        if is_model_unavailable(&message) {
            AttemptError::Unavailable(message)
        } else {
            AttemptError::Fatal(message)
        }
    }
}

pub fn is_model_unavailable(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("not found") || message.contains("not supported")
}

/// Try `candidates` in order, one at a time, returning the first success.
pub async fn first_available<T, F, Fut>(
    provider: &'static str,
    candidates: &[String],
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut last_error = None;

    for (index, candidate) in candidates.iter().enumerate() {
        debug!(
            "[{}] Trying model {} ({}/{})",
            provider,
            candidate,
            index + 1,
            candidates.len()
        );

        match attempt(candidate.clone()).await {
            Ok(value) => {
                if index > 0 {
                    info!(
                        "[{}] Model {} answered after {} fallback(s)",
                        provider, candidate, index
                    );
                }
                return Ok(value);
            }
            Err(AttemptError::Fatal(message)) => {
                error!("[{}] Model {} rejected request: {}", provider, candidate, message);
                return Err(RequestError::Rejected {
                    provider,
                    model: candidate.clone(),
                    message,
                }
                .into());
            }
            Err(AttemptError::Unavailable(message)) => {
                warn!(
                    "[{}] Model {} unavailable, trying next: {}",
                    provider, candidate, message
                );
                last_error = Some(message);
            }
        }
    }

    Err(RequestError::AllEndpointsExhausted {
        provider,
        attempts: candidates.len(),
        last_error: last_error.unwrap_or_else(|| "no models configured".to_string()),
    }
    .into())
}
