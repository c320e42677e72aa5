use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssetError>;

/// Single asset load failure
///
/// Always recovered inside the cache by moving to the next candidate.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset origin unreachable: {0}")]
    Unreachable(String),

    #[error("not an image asset: {0}")]
    InvalidAsset(String),
}
