//! Contact form validation and submission
//!
//! Field rules follow the portfolio sites: a required field must be non-blank
//! after trimming, and an e-mail field must look like `local@domain.tld`.
//! Submission hands the form to a [`Messenger`]; on failure the visitor is
//! pointed at a fallback address instead.

use crate::order::{Messenger, OutboundPayload};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail pattern"));

/// Message shown after a successful submission
pub const SENT_MESSAGE: &str = "✅ Message sent successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
}

/// One input of a contact form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
}

impl FormField {
    /// Required free-text field
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: FieldKind::Text,
            value: value.into(),
            required: true,
        }
    }

    /// Required e-mail field
    pub fn email(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Email,
            ..Self::text(label, value)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Valid,
    Invalid(String),
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }
}

/// Check a single field
pub fn validate_field(field: &FormField) -> FieldStatus {
    let value = field.value.trim();

    if value.is_empty() {
        if !field.required {
            return FieldStatus::Valid;
        }
        let label = if field.label.trim().is_empty() {
            "This field"
        } else {
            field.label.trim()
        };
        return FieldStatus::Invalid(format!("{} is required", label));
    }

    if field.kind == FieldKind::Email && !is_valid_email(value) {
        return FieldStatus::Invalid("Please enter a valid email".to_string());
    }

    FieldStatus::Valid
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// A validation failure tied to the field it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub label: String,
    pub message: String,
}

/// Ordered set of form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    fields: Vec<FormField>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The name / email / message form used on the portfolio sites
    pub fn standard(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new()
            .with_field(FormField::text("Name", name))
            .with_field(FormField::email("Email", email))
            .with_field(FormField::text("Message", message))
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Every failing field, in form order
    pub fn errors(&self) -> Vec<FieldError> {
        self.fields
            .iter()
            .filter_map(|field| match validate_field(field) {
                FieldStatus::Valid => None,
                FieldStatus::Invalid(message) => Some(FieldError {
                    label: field.label.clone(),
                    message,
                }),
            })
            .collect()
    }

    /// Whether the submit button would be enabled
    pub fn is_submittable(&self) -> bool {
        self.fields.iter().all(|field| validate_field(field).is_valid())
    }

    /// Blank every value, keeping the field layout
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
    }

    /// `Label: value` lines for the relay
    pub fn to_payload(&self) -> OutboundPayload {
        let body = self
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.label, field.value.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        OutboundPayload {
            subject: "Contact form".to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Rejected(Vec<FieldError>),
    /// The relay accepted the message and the form was reset
    Sent(String),
    /// The relay failed; the form keeps its values
    Failed { fallback: String },
}

/// Validate `form` and hand it to `messenger`
pub fn submit_contact<M>(form: &mut ContactForm, messenger: &mut M, fallback_email: &str) -> SubmitOutcome
where
    M: Messenger + ?Sized,
{
    let errors = form.errors();
    if !errors.is_empty() {
        log::debug!("Contact form rejected with {} errors", errors.len());
        return SubmitOutcome::Rejected(errors);
    }

    match messenger.send(&form.to_payload()) {
        Ok(()) => {
            log::info!("Contact form sent");
            form.reset();
            SubmitOutcome::Sent(SENT_MESSAGE.to_string())
        }
        Err(e) => {
            log::warn!("Contact form delivery failed: {}", e);
            SubmitOutcome::Failed {
                fallback: format!("❌ Please email directly: {}", fallback_email),
            }
        }
    }
}
