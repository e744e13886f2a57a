//! Client-side form validation.

use crate::error::Result;
use crate::types::{ContactForm, Field, FieldError, ValidationReport, MAX_ATTACHMENT_BYTES};
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^\+?[0-9\s-]{6,}$";

/// Validation rules of the contact form.
///
/// Text values are trimmed before checking. Every failing rule is
/// reported, in field order.
pub struct Validator {
    email: Regex,
    phone: Regex,
}

impl Validator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
        })
    }

    /// Check `form`; `captcha_present` tells whether the CAPTCHA widget is on the page
    pub fn validate(&self, form: &ContactForm, captcha_present: bool) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut fail = |field: Field, message: &str| {
            report.errors.push(FieldError {
                field,
                message: message.to_string(),
            });
            if field != Field::Recaptcha && report.first_invalid.is_none() {
                report.first_invalid = Some(field);
            }
        };

        if form.name.trim().is_empty() {
            fail(Field::Name, "Vyplň jméno.");
        }

        if !self.email.is_match(form.email.trim()) {
            fail(Field::Email, "Zadej platný e-mail.");
        }

        if form.subject.trim().is_empty() {
            fail(Field::Subject, "Vyber téma.");
        }

        if form.message.trim().is_empty() {
            fail(Field::Message, "Napiš zprávu.");
        }

        let phone = form.phone.trim();
        if !phone.is_empty() && !self.phone.is_match(phone) {
            fail(Field::Phone, "Telefon v neplatném formátu.");
        }

        if form
            .attachment
            .as_ref()
            .is_some_and(|file| file.size() > MAX_ATTACHMENT_BYTES)
        {
            fail(Field::File, "Soubor je větší než 10 MB.");
        }

        if !form.consent {
            fail(Field::Consent, "Potvrď souhlas.");
        }

        let has_token = form
            .captcha_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());
        if captcha_present && !has_token {
            fail(Field::Recaptcha, "Potvrď, že nejsi robot.");
        }

        report
    }
}
