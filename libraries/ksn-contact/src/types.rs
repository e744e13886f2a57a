//! Contact form data and submission results.

use serde::{Deserialize, Serialize};

/// Largest accepted attachment (10 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Relay endpoint used when the form names none
pub const DEFAULT_ENDPOINT: &str = "/api/contact";

/// Secondary endpoint tried once after the primary fails
pub const FALLBACK_ENDPOINT: &str = "/";

/// Recipient of the manual e-mail fallback
pub const BOOKING_ADDRESS: &str = "booking@ksn-bendl.cz";

/// Value of the `form-name` field when the form carries no name
pub const DEFAULT_FORM_NAME: &str = "contact";

/// File attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Values of the page's contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Empty when not provided
    pub phone: String,
    pub consent: bool,
    pub attachment: Option<Attachment>,
    /// `g-recaptcha-response` value when the widget is on the page
    pub captcha_token: Option<String>,
    pub form_name: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
            phone: String::new(),
            consent: false,
            attachment: None,
            captcha_token: None,
            form_name: DEFAULT_FORM_NAME.to_string(),
        }
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
    Phone,
    File,
    Consent,
    Recaptcha,
}

impl Field {
    /// Field name as used in the markup and the multipart body
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
            Field::Phone => "phone",
            Field::File => "file",
            Field::Consent => "consent",
            Field::Recaptcha => "recaptcha",
        }
    }
}

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Result of validating a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
    /// Field that should receive focus; the CAPTCHA never takes focus
    pub first_invalid: Option<Field>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message shown next to `field`, if any
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Relay accepted the form at `endpoint`
    Sent { endpoint: String },
    /// Every relay attempt failed; the user should be sent to this mailto link
    ManualFallback(String),
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}
