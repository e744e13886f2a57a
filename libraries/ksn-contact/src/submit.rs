//! Submission with endpoint fallback.

use crate::error::Result;
use crate::mailto::mailto_link;
use crate::types::{ContactForm, SubmitOutcome, DEFAULT_ENDPOINT, FALLBACK_ENDPOINT};
use async_trait::async_trait;
use tracing::{info, warn};

/// Delivers a form to one relay endpoint.
#[async_trait]
pub trait ContactTransport: Send + Sync {
    /// POST `form` to `endpoint`; any non-success status is an error
    async fn post(&self, endpoint: &str, form: &ContactForm) -> Result<()>;
}

/// Submit `form`, trying `primary` (default `/api/contact`) and then `/` once.
///
/// When both attempts fail the outcome carries the mailto link for the
/// manual fallback. A primary of `/` is not retried.
pub async fn submit<T>(transport: &T, form: &ContactForm, primary: Option<&str>) -> SubmitOutcome
where
    T: ContactTransport + ?Sized,
{
    let primary = primary
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT);

    let mut attempts = vec![primary];
    if primary != FALLBACK_ENDPOINT {
        attempts.push(FALLBACK_ENDPOINT);
    }

    for endpoint in attempts {
        match transport.post(endpoint, form).await {
            Ok(()) => {
                info!(endpoint, "Contact form submitted");
                return SubmitOutcome::Sent {
                    endpoint: endpoint.to_string(),
                };
            }
            Err(e) => warn!(endpoint, error = %e, "Contact submission failed"),
        }
    }

    SubmitOutcome::ManualFallback(mailto_link(form))
}
