//! Error types for media presentation

use thiserror::Error;

/// Media errors
///
/// None of these ever leave a component: players and carousels log them
/// and degrade the affected widget only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// Platform refused to start playback (autoplay policy, no source, ...)
    #[error("Playback start rejected: {0}")]
    PlayRejected(String),

    /// Platform refused to pause the element
    #[error("Pause rejected: {0}")]
    PauseRejected(String),

    /// Modal surface was already closed by the platform
    #[error("Modal surface already closed")]
    AlreadyClosed,

    /// Markup attributes did not describe a usable media item
    #[error("Invalid media item: {0}")]
    InvalidItem(String),

    /// Document API call failed
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Result type for media operations
pub type Result<T> = std::result::Result<T, MediaError>;
