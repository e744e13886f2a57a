/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Required contact fields are missing")]
    MissingFields,

    #[error("Attachment exceeds the size limit")]
    FileTooLarge,

    #[error("CAPTCHA verification failed")]
    CaptchaFailed,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ServerError {
    /// Machine-readable code placed in the `error` field of the response
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::MissingFields => "missing_fields",
            ServerError::FileTooLarge => "file_too_large",
            ServerError::CaptchaFailed => "captcha_failed",
            ServerError::BadRequest(_) => "bad_request",
            _ => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MissingFields
            | ServerError::FileTooLarge
            | ServerError::CaptchaFailed
            | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Contact submission failed: {}", self);
        } else {
            tracing::warn!("Rejected contact submission: {}", self);
        }

        let body = Json(json!({
            "ok": false,
            "error": self.code(),
        }));

        (status, body).into_response()
    }
}
