use speech::SpeechError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

/// Audio output failures
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Payload could not be decoded into playable audio
    #[error("audio decode error: {0}")]
    Decode(String),

    /// Output device unavailable
    #[error("audio device error: {0}")]
    Device(String),

    #[error("audio playback error: {0}")]
    Runtime(String),
}

/// Errors returned by [`crate::AvatarEngine`] operations
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Speech retrieval failed on every backend
    #[error(transparent)]
    Speech(SpeechError),

    /// Audio payload was malformed
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// A newer `play` or a `stop` replaced this request
    #[error("playback superseded by a newer request")]
    Superseded,

    #[error("playback failed: {0}")]
    Playback(String),
}

impl From<SpeechError> for PlayerError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::DecodeError(message) => Self::Decode(message),
            other => Self::Speech(other),
        }
    }
}

impl From<PlaybackError> for PlayerError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Decode(message) => Self::Decode(message),
            PlaybackError::Device(message) | PlaybackError::Runtime(message) => Self::Playback(message),
        }
    }
}
