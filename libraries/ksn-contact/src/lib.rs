//! KSN Site - Contact Client
//!
//! Client side of the site's contact form.
//!
//! # Features
//!
//! - **Validation**: field rules with the page's Czech messages
//! - **Submission**: relay endpoint first, `/` once as a fallback
//! - **Manual fallback**: prefilled `mailto:` link when the relay is down
//! - **Health probe**: `GET /api/health`
//!
//! # Example
//!
//! ```ignore
//! use ksn_contact::{submit, ContactClient, ContactForm, SubmitOutcome, Validator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let form = ContactForm {
//!         name: "Jana".into(),
//!         email: "jana@example.cz".into(),
//!         subject: "booking".into(),
//!         message: "Ahoj".into(),
//!         consent: true,
//!         ..ContactForm::default()
//!     };
//!
//!     let report = Validator::new()?.validate(&form, false);
//!     assert!(report.is_valid());
//!
//!     let client = ContactClient::new("https://ksn-bendl.cz")?;
//!     match submit(&client, &form, None).await {
//!         SubmitOutcome::Sent { endpoint } => println!("Sent via {endpoint}"),
//!         SubmitOutcome::ManualFallback(link) => println!("Open {link}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod mailto;
mod submit;
mod types;
mod validate;

pub use client::ContactClient;
pub use error::{ContactError, Result};
pub use mailto::mailto_link;
pub use submit::{submit, ContactTransport};
pub use types::{
    Attachment, ContactForm, Field, FieldError, HealthResponse, SubmitOutcome, ValidationReport,
    BOOKING_ADDRESS, DEFAULT_ENDPOINT, DEFAULT_FORM_NAME, FALLBACK_ENDPOINT, MAX_ATTACHMENT_BYTES,
};
pub use validate::Validator;
