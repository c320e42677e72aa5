#![allow(clippy::must_use_candidate)]

pub mod assets;
mod env;
mod loader;
pub mod player;
pub mod speech;
pub mod telemetry;

use serde::Deserialize;

pub use assets::*;
pub use env::{ENV_ASSET_ORIGIN, ENV_LOG, ENV_TTS_URL};
pub use player::*;
pub use speech::*;
pub use telemetry::TelemetryConfig;

/// Top-level visync configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Speech backend configuration
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Avatar frame asset configuration
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Playback configuration
    #[serde(default)]
    pub player: PlayerConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
