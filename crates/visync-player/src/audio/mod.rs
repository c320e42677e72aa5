//! Audio output seam
//!
//! The engine treats the output's playback position as the only clock.

mod clock;
#[cfg(feature = "rodio")]
mod device;

use async_trait::async_trait;
use speech::AudioData;

use crate::error::PlaybackError;

pub use clock::ClockAudio;
#[cfg(feature = "rodio")]
pub use device::RodioAudio;

/// Temporary resource held while a payload is attached to an output
///
/// Must be handed back through [`AudioOutput::release`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AudioHandle(u64);

impl AudioHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

/// Output status polled by the sync loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioStatus {
    /// Nothing attached
    Idle,
    Playing,
    Paused,
    /// Reached the end of the payload
    Ended,
    /// The output failed mid-playback
    Failed(String),
}

/// Single audio element the engine plays through
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Attach `audio`, replacing whatever was attached, paused at 0
    ///
    /// `duration_hint` is the backend-reported duration in seconds.
    async fn load(&self, audio: &AudioData, duration_hint: Option<f64>) -> Result<AudioHandle, PlaybackError>;

    /// Detach the payload behind `handle`; stale handles are ignored
    fn release(&self, handle: AudioHandle);

    fn play(&self) -> Result<(), PlaybackError>;

    fn pause(&self);

    /// Pause and rewind to 0
    fn stop(&self);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Total length in seconds once known
    fn duration(&self) -> Option<f64>;

    fn status(&self) -> AudioStatus;
}
