/// reCAPTCHA verification
use crate::{config::CaptchaSettings, error::Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaCheck {
    /// No secret configured or no token submitted
    Skipped,
    Passed,
    Failed,
}

impl CaptchaCheck {
    pub fn is_ok(self) -> bool {
        !matches!(self, CaptchaCheck::Failed)
    }
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Clone)]
pub struct CaptchaVerifier {
    http: Client,
    secret: Option<String>,
    url: String,
}

impl CaptchaVerifier {
    pub fn new(settings: &CaptchaSettings) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            secret: settings.secret.clone().filter(|s| !s.is_empty()),
            url: settings.url.clone(),
        })
    }

    /// Verify `token` against the siteverify endpoint
    ///
    /// A non-success HTTP status counts as a failed check; transport errors
    /// propagate.
    pub async fn verify(&self, token: Option<&str>) -> Result<CaptchaCheck> {
        let (Some(secret), Some(token)) = (self.secret.as_deref(), token.filter(|t| !t.is_empty()))
        else {
            return Ok(CaptchaCheck::Skipped);
        };

        let response = self
            .http
            .post(&self.url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("CAPTCHA verification request failed: {}", response.status());
            return Ok(CaptchaCheck::Failed);
        }

        let body: SiteVerifyResponse = response.json().await?;
        Ok(if body.success {
            CaptchaCheck::Passed
        } else {
            CaptchaCheck::Failed
        })
    }
}
