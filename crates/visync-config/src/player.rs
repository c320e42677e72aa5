use serde::Deserialize;
use visync_core::VisemeSet;

/// Playback configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    /// Vocabulary the engine builds timelines and preloads frames for
    #[serde(default)]
    pub viseme_set: VisemeSet,
    /// Sync loop ticks per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_speaker")]
    pub default_speaker: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            viseme_set: VisemeSet::default(),
            frame_rate: default_frame_rate(),
            default_speaker: default_speaker(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_frame_rate() -> u32 {
    60
}

fn default_speaker() -> String {
    "kelly".to_string()
}
