//! Scan orchestration: intake, vendor request, interpretation.

use crate::ai::{AnthropicDiagnosisClient, DiagnosisService, GeminiDiagnosisClient};
use crate::config::Config;
use crate::interpret::interpret;
use crate::intake;
use crate::models::{AnalysisOutcome, DiagnosisRecord, ImageInput, Provider};
use crate::prompts;
use crate::report;
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// What the presentation layer shows once a scan settles.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanView {
    Diagnosis(DiagnosisRecord),
    Message(String),
}

pub struct Scanner {
    service: Box<dyn DiagnosisService>,
    credential: Option<String>,
    latest: AtomicU64,
}

impl Scanner {
    /// Build a scanner around any diagnosis service.
    ///
    /// The credential is checked on every scan, so a scanner can be built
    /// before a key is configured.
    pub fn new(service: Box<dyn DiagnosisService>, credential: Option<String>) -> Self {
        Self {
            service,
            credential,
            latest: AtomicU64::new(0),
        }
    }

    /// Construct the configured vendor client.
    pub fn from_config(config: &Config) -> Self {
        let http_client = reqwest::Client::new();

        let service: Box<dyn DiagnosisService> = match config.provider {
            Provider::Anthropic => {
                info!("Diagnosis provider: Anthropic (model: {})", config.anthropic_model);
                Box::new(AnthropicDiagnosisClient::new_with_client(
                    config.anthropic_base_url.clone(),
                    config.anthropic_model.clone(),
                    config.request_timeout,
                    http_client,
                ))
            }
            Provider::Gemini => {
                info!(
                    "Diagnosis provider: Gemini (models: {})",
                    config.gemini_models.join(", ")
                );
                Box::new(GeminiDiagnosisClient::new_with_client(
                    config.gemini_base_url.clone(),
                    config.gemini_models.clone(),
                    config.request_timeout,
                    http_client,
                ))
            }
        };

        Self::new(service, config.credential().map(str::to_string))
    }

    pub fn provider(&self) -> Provider {
        self.service.provider()
    }

    /// Run one scan to its outcome.
    ///
    /// `Err` covers intake and vendor failures; anything the model said,
    /// however broken, is an `Ok` outcome.
    pub async fn analyze(&self, image: Option<&ImageInput>) -> Result<AnalysisOutcome> {
        let provider = self.service.provider();
        let prepared = intake::prepare(
            image,
            self.credential.as_deref(),
            provider.credential_var(),
        )?;

        debug!(
            "Prepared {} image ({} base64 chars), prompt v{}",
            prepared.image.mime_type,
            prepared.image.data.len(),
            prompts::DIAGNOSIS_VERSION
        );

        let envelope = self
            .service
            .request_diagnosis(prepared.api_key, &prepared.image)
            .await?;

        let outcome = interpret(&envelope);
        match &outcome {
            AnalysisOutcome::Success(record) => {
                info!("[{}] Diagnosis: {}", provider, report::headline(record))
            }
            AnalysisOutcome::UnclearImage => info!("[{}] Image reported unclear", provider),
            AnalysisOutcome::Failure(reason) => warn!("[{}] Analysis failed: {}", provider, reason),
        }

        Ok(outcome)
    }

    /// Like [`Scanner::analyze`], but returns `None` if another scan started
    /// on this scanner while this one was in flight.
    pub async fn analyze_latest(
        &self,
        image: Option<&ImageInput>,
    ) -> Option<Result<AnalysisOutcome>> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.analyze(image).await;

        let latest = self.latest.load(Ordering::SeqCst);
        if latest != ticket {
            debug!("Discarding scan #{} superseded by #{}", ticket, latest);
            return None;
        }
        Some(result)
    }

    /// Run a scan and collapse every end state into something displayable.
    pub async fn scan(&self, image: Option<&ImageInput>) -> ScanView {
        view(self.analyze(image).await)
    }
}

/// Map a scan result onto the presentation boundary.
pub fn view(result: Result<AnalysisOutcome>) -> ScanView {
    match result {
        Ok(AnalysisOutcome::Success(record)) => ScanView::Diagnosis(record),
        Ok(outcome) => ScanView::Message(report::outcome_message(&outcome)),
        Err(e) => ScanView::Message(e.to_string()),
    }
}
