//! Manual e-mail fallback.

use crate::types::{ContactForm, BOOKING_ADDRESS};

const DEFAULT_SUBJECT: &str = "Zpráva z webu";

/// Build the `mailto:` link offered when every relay attempt failed
///
/// Subject and body are percent-encoded component-wise.
pub fn mailto_link(form: &ContactForm) -> String {
    let subject = match form.subject.trim() {
        "" => DEFAULT_SUBJECT,
        subject => subject,
    };
    let subject = format!("Kontakt: {subject}");
    let body = format!(
        "Jméno: {}\nE-mail: {}\nTelefon: {}\n\nZpráva:\n{}",
        form.name.trim(),
        form.email.trim(),
        form.phone.trim(),
        form.message.trim()
    );

    format!(
        "mailto:{BOOKING_ADDRESS}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}
