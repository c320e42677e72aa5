use base64::Engine;
use serde::{Deserialize, Serialize};
use visync_core::{PhonemeEvent, SpeakerId, VisemeId};

use crate::error::{Result, SpeechError};

/// Speech synthesis request for one utterance
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub speaker: SpeakerId,
    /// Backend tried before every other candidate for this request
    pub endpoint_override: Option<String>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, speaker: SpeakerId) -> Self {
        Self {
            text: text.into(),
            speaker,
            endpoint_override: None,
        }
    }

    #[must_use]
    pub fn with_endpoint_override(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }
}

/// Container format of a decoded audio payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Map the backend's `audio_format` field; anything but `mp3` is WAV
    pub fn from_wire(format: Option<&str>) -> Self {
        match format.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("mp3") => Self::Mp3,
            _ => Self::Wav,
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }
}

/// Raw playable audio bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

/// Decoded speech with optional phoneme timing
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    pub audio: AudioData,
    /// Empty when the backend sent no timing; not an error
    pub phonemes: Vec<PhonemeEvent>,
    /// Reported duration in seconds, 0 when unknown
    pub duration: f64,
    /// Backend that produced this response
    pub endpoint: String,
}

// -- Wire types --

#[derive(Debug, Serialize)]
pub(crate) struct TtsRequest<'a> {
    pub text: &'a str,
    pub speaker: &'a str,
    pub include_phonemes: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TtsResponse {
    audio: String,
    #[serde(default)]
    audio_format: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    phonemes: Option<Vec<WirePhoneme>>,
}

#[derive(Debug, Deserialize)]
struct WirePhoneme {
    start: f64,
    end: f64,
    #[serde(default)]
    viseme: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<WirePhoneme> for PhonemeEvent {
    fn from(wire: WirePhoneme) -> Self {
        let viseme = wire.viseme.as_deref().map_or(VisemeId::Rest, VisemeId::from_wire);
        Self::new(wire.start, wire.end, viseme, wire.text.unwrap_or_default())
    }
}

impl TtsResponse {
    /// Decode the transport-encoded audio and normalise timing fields
    pub(crate) fn into_speech_response(self, endpoint: String) -> Result<SpeechResponse> {
        let bytes = decode_audio(&self.audio)?;
        let format = AudioFormat::from_wire(self.audio_format.as_deref());

        let duration = self.duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0);
        let phonemes: Vec<PhonemeEvent> = self
            .phonemes
            .unwrap_or_default()
            .into_iter()
            .map(PhonemeEvent::from)
            .collect();

        tracing::debug!(
            endpoint = %endpoint,
            bytes = bytes.len(),
            phonemes = phonemes.len(),
            duration,
            "speech payload decoded"
        );

        Ok(SpeechResponse {
            audio: AudioData { bytes, format },
            phonemes,
            duration,
            endpoint,
        })
    }
}

/// Decode a base64 audio payload, tolerating a `data:` URL prefix
fn decode_audio(payload: &str) -> Result<Vec<u8>> {
    let payload = payload.trim();
    let encoded = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };

    if encoded.is_empty() {
        return Err(SpeechError::DecodeError("empty audio payload".to_string()));
    }

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| SpeechError::DecodeError(format!("invalid base64 audio: {e}")))
}
