//! Error handling and custom error types
//!
//! Intake and request failures get their own enums so callers can tell a
//! local precondition apart from a vendor problem; both fold into [`Error`].

use thiserror::Error;

/// Failures raised before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please select an image first")]
    NoImageSelected,

    #[error("Unsupported media type '{0}'. Please choose an image file")]
    UnsupportedMediaType(String),

    #[error("Missing API key. Set {env_var} in .env")]
    MissingCredential { env_var: &'static str },
}

/// Failures talking to the inference vendor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    /// The vendor answered with an error that another model cannot fix.
    #[error("{provider} error ({model}): {message}")]
    Rejected {
        provider: &'static str,
        model: String,
        message: String,
    },

    #[error("{provider} error: no model available after {attempts} attempt(s): {last_error}")]
    AllEndpointsExhausted {
        provider: &'static str,
        attempts: usize,
        last_error: String,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_errors_read_as_user_messages() {
        let err: Error = IntakeError::MissingCredential {
            env_var: "GEMINI_API_KEY",
        }
        .into();
        assert_eq!(err.to_string(), "Missing API key. Set GEMINI_API_KEY in .env");

        let err: Error = IntakeError::NoImageSelected.into();
        assert_eq!(err.to_string(), "Please select an image first");
    }

    #[test]
    fn test_exhausted_error_carries_last_error() {
        let err = RequestError::AllEndpointsExhausted {
            provider: "Gemini",
            attempts: 3,
            last_error: "models/x is not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("Gemini error"));
        assert!(text.contains("3 attempt(s)"));
        assert!(text.contains("models/x is not found"));
    }
}
