use crate::Config;

/// Overrides `speech.endpoint_override`
pub const ENV_TTS_URL: &str = "VISYNC_TTS_URL";
/// Overrides `assets.origin`
pub const ENV_ASSET_ORIGIN: &str = "VISYNC_ASSET_ORIGIN";
/// Overrides `telemetry.log_filter`
pub const ENV_LOG: &str = "VISYNC_LOG";

impl Config {
    /// Apply `VISYNC_*` environment overrides on top of file values
    ///
    /// Unset or blank variables leave the configured value alone.
    pub fn apply_env(&mut self) {
        if let Some(url) = var(ENV_TTS_URL) {
            tracing::debug!(url = %url, "speech endpoint override from environment");
            self.speech.endpoint_override = Some(url);
        }

        if let Some(origin) = var(ENV_ASSET_ORIGIN) {
            tracing::debug!(origin = %origin, "asset origin override from environment");
            self.assets.origin = origin;
        }

        if let Some(filter) = var(ENV_LOG) {
            self.telemetry.log_filter = filter;
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
