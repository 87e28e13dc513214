//! AgriScan - plant pest and disease diagnosis from a single photo
//!
//! Sends a plant photo to a vision-language model (Gemini or Anthropic),
//! parses the JSON diagnosis from the model's answer, and turns every end
//! state into something a user interface can show.

pub mod ai;
pub mod config;
pub mod error;
pub mod intake;
pub mod interpret;
pub mod models;
pub mod prompts;
pub mod report;
pub mod scanner;

pub use error::{Error, Result};
