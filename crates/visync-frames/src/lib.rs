//! Avatar frame assets
//!
//! [`FrameCache`] warms every viseme frame for a speaker from a list of
//! candidate path templates and answers render-time lookups, degrading to
//! the speaker's rest frame when a viseme has no asset.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod asset;
mod cache;
mod error;
mod http_client;
mod loader;
pub mod template;

pub use asset::AssetRef;
pub use cache::{FrameCache, FrameKey, PreloadReport};
pub use error::{AssetError, Result};
pub use loader::{AssetLoader, HttpAssetLoader};
