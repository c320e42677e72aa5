//! Mock speech backend for integration tests
//!
//! Serves `POST /api/tts` with a generated WAV payload and canned
//! phoneme timing.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use base64::Engine;
use tokio_util::sync::CancellationToken;

/// Sample rate of generated payloads
const SAMPLE_RATE: u32 = 8000;

/// Mock TTS backend with predictable responses
pub struct MockTts {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockTtsState>,
}

struct MockTtsState {
    request_count: AtomicU32,
    /// Number of requests to fail before succeeding
    fail_count: AtomicU32,
    phonemes: Option<serde_json::Value>,
    duration: f64,
    corrupt_audio: bool,
    last_request: Mutex<Option<serde_json::Value>>,
}

impl MockTts {
    /// Three-phoneme utterance lasting 0.3 s
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, Some(default_phonemes()), 0.3, false).await
    }

    /// Fail the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, Some(default_phonemes()), 0.3, false).await
    }

    /// Respond with audio only, no timing and no reported duration
    pub async fn start_without_phonemes(audio_seconds: f64) -> anyhow::Result<Self> {
        Self::start_inner(0, None, audio_seconds, false).await
    }

    /// Answer 200 with an audio payload that is not valid base64
    pub async fn start_corrupt() -> anyhow::Result<Self> {
        Self::start_inner(0, Some(default_phonemes()), 0.3, true).await
    }

    async fn start_inner(
        fail_count: u32,
        phonemes: Option<serde_json::Value>,
        duration: f64,
        corrupt_audio: bool,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockTtsState {
            request_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            phonemes,
            duration,
            corrupt_audio,
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/tts", routing::post(handle_tts))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for use as a speech endpoint candidate
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// JSON body of the most recent request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }
}

impl Drop for MockTts {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Address nothing listens on
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn default_phonemes() -> serde_json::Value {
    serde_json::json!([
        {"phoneme": "AA", "viseme": "A", "start": 0.0, "end": 0.1, "text": "ah"},
        {"phoneme": "M", "viseme": "MBP", "start": 0.1, "end": 0.2, "text": "ma"},
        {"phoneme": "sil", "viseme": "sil", "start": 0.2, "end": 0.3}
    ])
}

/// Mono 16-bit silence of the given length
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wav_bytes(seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let samples = (seconds * f64::from(SAMPLE_RATE)) as u32;

    let mut bytes = Vec::new();
    let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
    for _ in 0..samples {
        writer.write_sample(0_i16).unwrap();
    }
    writer.finalize().unwrap();
    bytes
}

async fn handle_tts(State(state): State<Arc<MockTtsState>>, Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    *state.last_request.lock().unwrap() = Some(body);

    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
        return (StatusCode::INTERNAL_SERVER_ERROR, "synthesis failed").into_response();
    }

    let audio = if state.corrupt_audio {
        "%%% not base64 %%%".to_owned()
    } else {
        base64::engine::general_purpose::STANDARD.encode(wav_bytes(state.duration))
    };

    let body = match &state.phonemes {
        Some(phonemes) => serde_json::json!({
            "audio": audio,
            "audio_format": "wav",
            "duration": state.duration,
            "phonemes": phonemes,
        }),
        None => serde_json::json!({
            "audio": audio,
            "audio_format": "wav",
            "phonemes": null,
        }),
    };

    Json(body).into_response()
}
