/// Shared application state
use crate::{
    config::ServerConfig,
    error::Result,
    services::{CaptchaVerifier, Mailer, SubmissionStore},
};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<SubmissionStore>,
    pub captcha: Arc<CaptchaVerifier>,
    /// Present only when SMTP is fully configured
    pub mailer: Option<Arc<Mailer>>,
}

impl AppState {
    pub fn new(
        submissions: Arc<SubmissionStore>,
        captcha: Arc<CaptchaVerifier>,
        mailer: Option<Arc<Mailer>>,
    ) -> Self {
        Self {
            submissions,
            captcha,
            mailer,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let submissions = Arc::new(SubmissionStore::new(config.site.data.clone())?);
        let captcha = Arc::new(CaptchaVerifier::new(&config.captcha)?);
        let mailer = Mailer::from_settings(&config.smtp)?.map(Arc::new);

        Ok(Self::new(submissions, captcha, mailer))
    }
}
