//! Plain-text rendering of scan results.

use crate::models::{AnalysisOutcome, DiagnosisRecord, FailureReason, Treatment};

pub const NO_ISSUE_HEADLINE: &str = "No significant issue detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Unknown,
}

impl Severity {
    /// Case-insensitive; anything else is `Unknown`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Severity::Low,
            Some("medium") => Severity::Medium,
            Some("high") => Severity::High,
            _ => Severity::Unknown,
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Severity::Low => "[LOW]",
            Severity::Medium => "[MEDIUM]",
            Severity::High => "[HIGH]",
            Severity::Unknown => "[?]",
        }
    }
}

pub fn headline(record: &DiagnosisRecord) -> &str {
    non_blank(record.pest_name.as_deref())
        .or_else(|| non_blank(record.disease_name.as_deref()))
        .unwrap_or(NO_ISSUE_HEADLINE)
}

/// User-facing text for outcomes that carry no diagnosis.
pub fn outcome_message(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Success(record) => format!("Diagnosis: {}", headline(record)),
        AnalysisOutcome::UnclearImage => {
            "Image quality is unclear. Upload a clear, well-lit photo.".to_string()
        }
        AnalysisOutcome::Failure(FailureReason::NoTextContent) => {
            "Unable to analyze the image. Check key, billing, or image size.".to_string()
        }
        AnalysisOutcome::Failure(FailureReason::MalformedJson(_)) => {
            "Failed to analyze image. The model returned an unreadable diagnosis.".to_string()
        }
    }
}

/// Render a diagnosis report; empty sections are left out.
pub fn render(record: &DiagnosisRecord) -> String {
    let mut out = format!("Detected: {}\n", headline(record));
    if let Some(severity) = non_blank(record.severity.as_deref()) {
        let level = Severity::from_label(Some(severity));
        out.push_str(&format!("Severity: {} {}\n", level.badge(), severity));
    }

    out.push_str(&list_section("Symptoms", record.symptoms.as_deref()));
    if let Some(cause) = non_blank(record.cause.as_deref()) {
        out.push_str(&format!("\nCause:\n  {}\n", cause));
    }
    out.push_str(&treatment_section(
        "Organic treatment",
        record.organic_solution.as_ref(),
    ));
    out.push_str(&treatment_section(
        "Chemical treatment",
        record.chemical_solution.as_ref(),
    ));
    out.push_str(&list_section("Prevention", record.prevention.as_deref()));

    out
}

fn list_section(title: &str, items: Option<&[String]>) -> String {
    match items {
        Some(items) if !items.is_empty() => {
            let lines: String = items.iter().map(|item| format!("  - {}\n", item)).collect();
            format!("\n{}:\n{}", title, lines)
        }
        _ => String::new(),
    }
}

fn treatment_section(title: &str, treatment: Option<&Treatment>) -> String {
    let Some(treatment) = treatment else {
        return String::new();
    };
    let value = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();
    format!(
        "\n{}:\n  Pesticide: {}\n  Dosage: {}\n  Application: {}\n",
        title,
        value(&treatment.pesticide),
        value(&treatment.dosage),
        value(&treatment.application)
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
