//! Error handling for tubestream

use thiserror::Error;

/// Main error type for stream resolution
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Malformed audio rendition type: {mime_type}")]
    MalformedRendition { mime_type: String },

    #[error("No audio renditions available")]
    EmptyAudioLadder,

    #[error("Live stream has no target segment duration")]
    MissingSegmentDuration,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Player response not found in watch page")]
    PlayerResponseNotFound,

    #[error("Video unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
