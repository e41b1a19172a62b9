use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::fonts::FontSources;

pub(crate) const FALLBACK_PATIENT_NAME: &str = "Unknown patient";
pub(crate) const FALLBACK_EMAIL: &str = "Not provided";
pub(crate) const FALLBACK_PROCEDURE: &str = "Consent Form";
pub(crate) const FALLBACK_SIGNATURE: &str = "(signature not recorded)";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientName {
    pub first: String,
    pub last: String,
}

impl PatientName {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// "First Last" with blank parts dropped; `None` when both are blank.
    pub fn full(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first.trim(), self.last.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Everything the generator needs to lay out one consent document.
#[derive(Clone, Debug)]
pub struct ConsentDocumentInput {
    pub patient_name: PatientName,
    pub patient_email: String,
    pub procedure_name: Option<String>,
    pub consent_body: Option<String>,
    pub signature_text: String,
    pub signed_at: DateTime<Utc>,
    pub provider_display_name: Option<String>,
    pub practice_name: Option<String>,
    /// IANA zone used only to format `signed_at`.
    pub timezone_id: Option<String>,
    pub submission_id: String,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl ConsentDocumentInput {
    /// Assemble the input from the upstream records. Module and provider are optional;
    /// the submission's `signed_at` falls back to its creation time.
    pub fn from_records(
        submission: &SubmissionRecord,
        module: Option<&ModuleRecord>,
        provider: Option<&ProviderRecord>,
    ) -> Self {
        Self {
            patient_name: PatientName::new(
                submission.patient_first_name.clone().unwrap_or_default(),
                submission.patient_last_name.clone().unwrap_or_default(),
            ),
            patient_email: submission.patient_email.clone().unwrap_or_default(),
            procedure_name: module.and_then(|m| m.name.clone()),
            consent_body: module.and_then(|m| m.description.clone()),
            signature_text: submission.signature.clone().unwrap_or_default(),
            signed_at: submission.signed_at.unwrap_or(submission.created_at),
            provider_display_name: provider.and_then(|p| p.full_name.clone()),
            practice_name: provider.and_then(|p| p.practice_name.clone()),
            timezone_id: provider.and_then(|p| p.timezone.clone()),
            submission_id: submission.id.clone(),
        }
    }

    pub(crate) fn patient_display_name(&self) -> String {
        self.patient_name
            .full()
            .unwrap_or_else(|| FALLBACK_PATIENT_NAME.to_string())
    }

    pub(crate) fn email_display(&self) -> &str {
        let email = self.patient_email.trim();
        if email.is_empty() { FALLBACK_EMAIL } else { email }
    }

    pub(crate) fn procedure_title(&self) -> &str {
        non_blank(self.procedure_name.as_ref()).unwrap_or(FALLBACK_PROCEDURE)
    }

    pub(crate) fn signature_display(&self) -> &str {
        let sig = self.signature_text.trim();
        if sig.is_empty() { FALLBACK_SIGNATURE } else { sig }
    }

    /// Heading line for the provider block: the practice if known, else the provider.
    pub(crate) fn practice_heading(&self) -> Option<&str> {
        non_blank(self.practice_name.as_ref())
            .or_else(|| non_blank(self.provider_display_name.as_ref()))
    }

    /// Secondary "Provider:" line, shown only when both names are known.
    pub(crate) fn provider_line(&self) -> Option<String> {
        non_blank(self.practice_name.as_ref())?;
        non_blank(self.provider_display_name.as_ref()).map(|name| format!("Provider: {name}"))
    }
}

/// One structured chunk of consent text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<String>,
    pub paragraphs: Vec<String>,
    pub bullets: Vec<String>,
}

impl Section {
    pub(crate) fn titled(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.paragraphs.is_empty() && self.bullets.is_empty()
    }
}

pub struct RenderOptions {
    /// Product name printed in every page footer.
    pub brand: String,
    pub fonts: FontSources,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            brand: "ClearConsent".to_string(),
            fonts: FontSources::default(),
        }
    }
}

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub content_type: &'static str,
}

/// Caller request: which submission to render and whether to rebuild a stored copy.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentRequest {
    #[serde(rename = "submissionId", alias = "submission_id", default)]
    pub submission_id: String,
    #[serde(default = "default_regenerate")]
    pub regenerate: bool,
}

fn default_regenerate() -> bool {
    true
}

impl DocumentRequest {
    pub fn new(submission_id: impl Into<String>) -> Self {
        Self {
            submission_id: submission_id.into(),
            regenerate: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    #[serde(default)]
    pub patient_first_name: Option<String>,
    #[serde(default)]
    pub patient_last_name: Option<String>,
    #[serde(default)]
    pub patient_email: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub provider_id: String,
    #[serde(default)]
    pub module_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModuleRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderRecord {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub practice_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}
