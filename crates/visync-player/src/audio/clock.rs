use std::{
    io::Cursor,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use speech::{AudioData, AudioFormat};
use tokio::time::Instant;

use super::{AudioHandle, AudioOutput, AudioStatus};
use crate::error::PlaybackError;

/// Assumed bitrate for MP3 payloads with no reported duration
const MP3_ASSUMED_BITS_PER_SECOND: f64 = 128_000.0;

/// Silent output that advances a software clock in real time
///
/// Used for headless runs and tests. The length comes from the reported
/// duration, else from the WAV header.
#[derive(Debug, Default)]
pub struct ClockAudio {
    state: Mutex<ClockState>,
}

#[derive(Debug, Default)]
struct ClockState {
    next_handle: u64,
    loaded: Option<u64>,
    duration: Option<f64>,
    /// Position accumulated before the current run
    offset: f64,
    started: Option<Instant>,
}

impl ClockState {
    fn position(&self) -> f64 {
        let running = self.started.map_or(0.0, |started| started.elapsed().as_secs_f64());
        let position = self.offset + running;
        self.duration.map_or(position, |duration| position.min(duration))
    }

    fn finished(&self) -> bool {
        self.duration.is_some_and(|duration| self.position() >= duration)
    }
}

impl ClockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Length of a payload in seconds
#[allow(clippy::cast_precision_loss)]
fn payload_duration(audio: &AudioData, hint: Option<f64>) -> Result<f64, PlaybackError> {
    if audio.bytes.is_empty() {
        return Err(PlaybackError::Decode("empty audio payload".to_string()));
    }

    let hint = hint.filter(|d| d.is_finite() && *d > 0.0);

    match audio.format {
        AudioFormat::Wav => {
            let reader = hound::WavReader::new(Cursor::new(audio.bytes.as_slice()))
                .map_err(|e| PlaybackError::Decode(format!("invalid WAV payload: {e}")))?;
            let sample_rate = reader.spec().sample_rate;
            if sample_rate == 0 {
                return Err(PlaybackError::Decode("WAV sample rate is 0".to_string()));
            }
            Ok(hint.unwrap_or_else(|| f64::from(reader.duration()) / f64::from(sample_rate)))
        }
        AudioFormat::Mp3 => Ok(hint.unwrap_or_else(|| {
            let estimate = audio.bytes.len() as f64 * 8.0 / MP3_ASSUMED_BITS_PER_SECOND;
            tracing::debug!(estimate, "no reported duration for MP3 payload, estimating from size");
            estimate
        })),
    }
}

#[async_trait]
impl AudioOutput for ClockAudio {
    async fn load(&self, audio: &AudioData, duration_hint: Option<f64>) -> Result<AudioHandle, PlaybackError> {
        let duration = payload_duration(audio, duration_hint)?;

        let mut state = self.state();
        state.next_handle += 1;
        let id = state.next_handle;
        *state = ClockState {
            next_handle: id,
            loaded: Some(id),
            duration: Some(duration),
            offset: 0.0,
            started: None,
        };

        tracing::debug!(handle = id, duration, format = audio.format.mime_type(), "clock audio loaded");

        Ok(AudioHandle::new(id))
    }

    fn release(&self, handle: AudioHandle) {
        let mut state = self.state();
        if state.loaded == Some(handle.id()) {
            let next_handle = state.next_handle;
            *state = ClockState {
                next_handle,
                ..ClockState::default()
            };
        }
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let mut state = self.state();
        if state.loaded.is_none() {
            return Err(PlaybackError::Runtime("no audio loaded".to_string()));
        }
        if state.started.is_some() {
            return Ok(());
        }
        if state.finished() {
            state.offset = 0.0;
        }
        state.started = Some(Instant::now());
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state();
        state.offset = state.position();
        state.started = None;
    }

    fn stop(&self) {
        let mut state = self.state();
        state.offset = 0.0;
        state.started = None;
    }

    fn current_time(&self) -> f64 {
        let state = self.state();
        if state.loaded.is_some() { state.position() } else { 0.0 }
    }

    fn duration(&self) -> Option<f64> {
        let state = self.state();
        state.loaded.and(state.duration)
    }

    fn status(&self) -> AudioStatus {
        let state = self.state();
        if state.loaded.is_none() {
            AudioStatus::Idle
        } else if state.finished() {
            AudioStatus::Ended
        } else if state.started.is_some() {
            AudioStatus::Playing
        } else {
            AudioStatus::Paused
        }
    }
}
