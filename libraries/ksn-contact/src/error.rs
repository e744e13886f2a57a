//! Error types for the contact client.

use thiserror::Error;

/// Errors that can occur while submitting the contact form.
#[derive(Error, Debug)]
pub enum ContactError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Relay answered with a non-success status
    #[error("Relay rejected submission ({status}): {message}")]
    Status { status: u16, message: String },

    /// Invalid base URL or endpoint
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Relay is offline or unreachable
    #[error("Relay unreachable: {0}")]
    Unreachable(String),

    /// Failed to parse relay response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Validation pattern failed to compile
    #[error("Invalid validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for contact client operations.
pub type Result<T> = std::result::Result<T, ContactError>;
