use serde::Serialize;
use strum::Display;
use visync_core::{Emotion, SpeakerId, SpeechContext, VisemeSet};

/// Session state as observed through [`crate::AvatarEngine::subscribe`]
///
/// `Idle -> Loading -> Playing -> {Paused, Ended, Error}`, with
/// `Paused -> Playing` on resume. A new `play` starts over from `Loading`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Error,
}

/// Vocabulary and cache summary
#[derive(Debug, Clone, Serialize)]
pub struct VisemeStats {
    pub viseme_set: VisemeSet,
    pub total: usize,
    pub basic: usize,
    pub enhanced: usize,
    pub emotional: usize,
    pub contextual: usize,
    pub cached_frames: usize,
    pub speaker: Option<SpeakerId>,
    pub emotion: Option<Emotion>,
    pub context: Option<SpeechContext>,
}
