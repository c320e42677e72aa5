use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpeechError>;

/// Speech retrieval errors
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Every candidate backend failed; `last` is the final failure
    #[error("no speech endpoint reachable ({attempts} tried)")]
    EndpointUnreachable {
        attempts: usize,
        #[source]
        last: Option<Box<SpeechError>>,
    },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Backend answered with a non-success status
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Backend answered 2xx with a body that is not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Audio payload could not be decoded
    #[error("Audio decode error: {0}")]
    DecodeError(String),

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SpeechError {
    /// The failure that ended a failover pass, if this is one
    pub fn last_error(&self) -> Option<&Self> {
        match self {
            Self::EndpointUnreachable { last, .. } => last.as_deref(),
            _ => None,
        }
    }
}
