use std::{
    io::Cursor,
    sync::{
        Mutex, MutexGuard, PoisonError,
        mpsc::{self, Sender},
    },
    thread,
};

use async_trait::async_trait;
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use speech::AudioData;

use super::{AudioHandle, AudioOutput, AudioStatus};
use crate::error::PlaybackError;

/// Plays through the default output device
///
/// The output stream lives on a dedicated thread for as long as this
/// value exists; playback is controlled through its sink.
pub struct RodioAudio {
    sink: Sink,
    /// Dropping this ends the stream thread
    _stream_guard: Sender<()>,
    state: Mutex<DeviceState>,
}

#[derive(Debug, Default)]
struct DeviceState {
    next_handle: u64,
    loaded: Option<u64>,
    duration: Option<f64>,
    started: bool,
    stopped: bool,
}

impl RodioAudio {
    /// Open the default output device
    pub fn open_default() -> Result<Self, PlaybackError> {
        let (sink_tx, sink_rx) = mpsc::channel::<Result<Sink, String>>();
        let (guard_tx, guard_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("visync-audio".to_string())
            .spawn(move || match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => {
                    let sink = Sink::connect_new(stream.mixer());
                    sink.pause();
                    if sink_tx.send(Ok(sink)).is_ok() {
                        // Blocks until the guard sender is dropped
                        let _ = guard_rx.recv();
                    }
                    drop(stream);
                }
                Err(e) => {
                    let _ = sink_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| PlaybackError::Device(format!("failed to start audio thread: {e}")))?;

        let sink = sink_rx
            .recv()
            .map_err(|e| PlaybackError::Device(format!("audio thread exited: {e}")))?
            .map_err(PlaybackError::Device)?;

        tracing::info!("opened default audio output");

        Ok(Self {
            sink,
            _stream_guard: guard_tx,
            state: Mutex::default(),
        })
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AudioOutput for RodioAudio {
    async fn load(&self, audio: &AudioData, duration_hint: Option<f64>) -> Result<AudioHandle, PlaybackError> {
        if audio.bytes.is_empty() {
            return Err(PlaybackError::Decode("empty audio payload".to_string()));
        }

        let decoder = Decoder::new(Cursor::new(audio.bytes.clone()))
            .map_err(|e| PlaybackError::Decode(format!("{}: {e}", audio.format.mime_type())))?;
        let duration = duration_hint
            .filter(|d| d.is_finite() && *d > 0.0)
            .or_else(|| decoder.total_duration().map(|d| d.as_secs_f64()));

        self.sink.clear();
        self.sink.append(decoder);

        let mut state = self.state();
        state.next_handle += 1;
        state.loaded = Some(state.next_handle);
        state.duration = duration;
        state.started = false;
        state.stopped = false;

        Ok(AudioHandle::new(state.next_handle))
    }

    fn release(&self, handle: AudioHandle) {
        let mut state = self.state();
        if state.loaded == Some(handle.id()) {
            self.sink.clear();
            state.loaded = None;
            state.duration = None;
            state.started = false;
        }
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let mut state = self.state();
        if state.loaded.is_none() || state.stopped {
            return Err(PlaybackError::Runtime("no audio loaded".to_string()));
        }
        state.started = true;
        self.sink.play();
        Ok(())
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.sink.clear();
        self.state().stopped = true;
    }

    fn current_time(&self) -> f64 {
        let state = self.state();
        if state.loaded.is_none() || state.stopped {
            return 0.0;
        }
        self.sink.get_pos().as_secs_f64()
    }

    fn duration(&self) -> Option<f64> {
        let state = self.state();
        state.loaded.and(state.duration)
    }

    fn status(&self) -> AudioStatus {
        let state = self.state();
        if state.loaded.is_none() || state.stopped {
            AudioStatus::Idle
        } else if state.started && self.sink.empty() {
            AudioStatus::Ended
        } else if self.sink.is_paused() {
            AudioStatus::Paused
        } else {
            AudioStatus::Playing
        }
    }
}
