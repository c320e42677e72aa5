//! Talking-avatar playback
//!
//! [`AvatarEngine`] owns one playback session at a time: it fetches
//! speech, plans the viseme timeline, warms the frame cache and runs a
//! sync loop that keeps the displayed mouth shape aligned with the audio
//! output's own playback clock.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod audio;
mod engine;
mod error;
mod scheduler;
mod state;
mod surface;
mod sync;

pub use audio::{AudioHandle, AudioOutput, AudioStatus, ClockAudio};
#[cfg(feature = "rodio")]
pub use audio::RodioAudio;
pub use engine::{AvatarEngine, EngineOptions, PlayOptions};
pub use error::{PlaybackError, PlayerError, Result};
pub use scheduler::{FrameScheduler, IntervalScheduler};
pub use state::{PlaybackState, VisemeStats};
pub use surface::AvatarSurface;
