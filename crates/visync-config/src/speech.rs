use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_PRODUCTION_URL: &str = "https://tts-server-production-61b7.up.railway.app";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Speech synthesis backend configuration
///
/// Candidates are tried in the order: `endpoint_override`, the last
/// endpoint that answered, `production_url`, `local_url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Highest-priority backend, e.g. from `VISYNC_TTS_URL`
    #[serde(default)]
    pub endpoint_override: Option<String>,
    #[serde(default = "default_production_url")]
    pub production_url: String,
    /// Development backend tried last
    #[serde(default)]
    pub local_url: Option<String>,
    /// Request path appended to every candidate base address
    #[serde(default = "default_path")]
    pub path: String,
    /// Per-request timeout as a duration string (`"30s"`, `"1m"`)
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint_override: None,
            production_url: default_production_url(),
            local_url: None,
            path: default_path(),
            timeout: default_timeout(),
        }
    }
}

impl SpeechConfig {
    /// Parsed request timeout, falling back to 30s when unparseable
    pub fn request_timeout(&self) -> Duration {
        duration_str::parse(&self.timeout).unwrap_or(DEFAULT_TIMEOUT)
    }
}

fn default_production_url() -> String {
    DEFAULT_PRODUCTION_URL.to_string()
}

fn default_path() -> String {
    "/api/tts".to_string()
}

fn default_timeout() -> String {
    "30s".to_string()
}
