use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use visync_config::SpeechConfig;

use crate::{
    error::{Result, SpeechError},
    http_client::http_client,
    resolver::EndpointResolver,
    types::{SpeechRequest, SpeechResponse, TtsRequest, TtsResponse},
};

/// Source of synthesized speech for the player
#[async_trait]
pub trait SpeechSource: Send + Sync {
    /// Synthesize `request`, failing over across backends as needed
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse>;

    /// Backend that most recently answered, if any
    fn resolved_endpoint(&self) -> Option<String> {
        None
    }
}

/// HTTP speech client over the `/api/tts` protocol
pub struct SpeechClient {
    client: Client,
    resolver: EndpointResolver,
    path: String,
    timeout: Duration,
    endpoint_override: Option<String>,
}

impl SpeechClient {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            client: http_client(),
            resolver: EndpointResolver::from_config(config),
            path: config.path.clone(),
            timeout: config.request_timeout(),
            endpoint_override: config.endpoint_override.clone(),
        }
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// One attempt against a single backend
    async fn request(&self, base: String, text: &str, speaker: &str) -> Result<TtsResponse> {
        let url = format!("{base}{}", self.path);

        tracing::debug!(url = %url, speaker, input_len = text.len(), "speech request");

        let body = TtsRequest {
            text,
            speaker,
            include_phonemes: true,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::ConnectionError(format!("Failed to send request to {base}: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(SpeechError::ProviderApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<TtsResponse>()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse speech response from {base}: {e}")))
    }
}

#[async_trait]
impl SpeechSource for SpeechClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        if request.text.trim().is_empty() {
            return Err(SpeechError::InvalidRequest("text is empty".to_string()));
        }

        let override_url = request
            .endpoint_override
            .as_deref()
            .or(self.endpoint_override.as_deref());
        let speaker = request.speaker.as_str();

        // Decoded before the endpoint is remembered; a corrupt payload is
        // fatal rather than a reason to fail over
        let resolved = self
            .resolver
            .resolve_with(
                override_url,
                |base| self.request(base, &request.text, speaker),
                |endpoint, response: TtsResponse| response.into_speech_response(endpoint.to_owned()),
            )
            .await?;

        Ok(resolved.value)
    }

    fn resolved_endpoint(&self) -> Option<String> {
        self.resolver.last_known_good()
    }
}
