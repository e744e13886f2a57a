//! HTTP transport to the contact relay.

use crate::error::{ContactError, Result};
use crate::submit::ContactTransport;
use crate::types::{ContactForm, HealthResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Relay client bound to the site origin.
///
/// # Example
///
/// ```ignore
/// use ksn_contact::{submit, ContactClient, ContactForm};
///
/// let client = ContactClient::new("https://ksn-bendl.cz")?;
/// let outcome = submit(&client, &form, None).await;
/// ```
pub struct ContactClient {
    http: Client,
    base_url: Url,
}

impl ContactClient {
    /// Create a client for the site at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(ContactError::InvalidUrl("URL cannot be empty".into()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ContactError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url = Url::parse(base_url).map_err(|e| ContactError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("KsnSite/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a site-relative endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ContactError::InvalidUrl(e.to_string()))
    }

    /// Check `GET /api/health`; true when the relay reports `{ok: true}`
    pub async fn probe_health(&self) -> Result<bool> {
        let url = self.endpoint_url("/api/health")?;
        debug!(url = %url, "Probing relay health");

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ContactError::Unreachable(e.to_string())
            } else {
                ContactError::Request(e)
            }
        })?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| ContactError::ParseError(format!("Failed to parse health: {}", e)))?;
        Ok(health.ok)
    }
}

/// Multipart body mirroring the page form.
fn multipart(form: &ContactForm) -> Result<Form> {
    let mut body = Form::new()
        .text("name", form.name.trim().to_string())
        .text("email", form.email.trim().to_string())
        .text("subject", form.subject.trim().to_string())
        .text("message", form.message.trim().to_string())
        .text("phone", form.phone.trim().to_string())
        .text("form-name", form.form_name.clone());

    if form.consent {
        body = body.text("consent", "on");
    }
    if let Some(token) = &form.captcha_token {
        body = body.text("g-recaptcha-response", token.clone());
    }
    if let Some(file) = &form.attachment {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        body = body.part("file", part);
    }

    Ok(body)
}

#[async_trait]
impl ContactTransport for ContactClient {
    async fn post(&self, endpoint: &str, form: &ContactForm) -> Result<()> {
        let url = self.endpoint_url(endpoint)?;
        debug!(url = %url, "Posting contact form");

        let response = self.http.post(url).multipart(multipart(form)?).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ContactError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}
