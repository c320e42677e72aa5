use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimelineError>;

/// Timeline construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// The phoneme stream had no usable events; use the heuristic
    /// synthesizer instead
    #[error("no usable phoneme events")]
    NoPhonemes,
}
