//! Linear endpoint failover with a remembered winner
//!
//! Each pass walks the candidate list once, in priority order, and stops
//! at the first backend that answers. The winner is tried first (after
//! an explicit override) on the next pass.

use std::{future::Future, sync::RwLock};

use visync_config::SpeechConfig;

use crate::error::{Result, SpeechError};

/// Successful resolution: which endpoint answered, and its answer
#[derive(Debug)]
pub struct Resolved<T> {
    pub endpoint: String,
    pub value: T,
}

/// Chooses a reachable speech backend from prioritized candidates
#[derive(Debug)]
pub struct EndpointResolver {
    production_url: String,
    local_url: Option<String>,
    /// Last endpoint that answered successfully
    last_good: RwLock<Option<String>>,
}

impl EndpointResolver {
    pub fn new(production_url: impl Into<String>, local_url: Option<String>) -> Self {
        Self {
            production_url: production_url.into(),
            local_url,
            last_good: RwLock::new(None),
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.production_url.clone(), config.local_url.clone())
    }

    pub fn last_known_good(&self) -> Option<String> {
        self.last_good.read().ok().and_then(|guard| guard.clone())
    }

    fn remember(&self, endpoint: &str) {
        if let Ok(mut guard) = self.last_good.write()
            && guard.as_deref() != Some(endpoint)
        {
            tracing::info!(endpoint, "speech endpoint selected");
            *guard = Some(endpoint.to_owned());
        }
    }

    /// Ordered, de-duplicated candidate base addresses
    ///
    /// Order: `override_url`, last known good, production, local. Blank
    /// entries are skipped and trailing slashes are dropped before
    /// comparing.
    pub fn candidates(&self, override_url: Option<&str>) -> Vec<String> {
        let last_good = self.last_known_good();
        let ordered = [
            override_url,
            last_good.as_deref(),
            Some(self.production_url.as_str()),
            self.local_url.as_deref(),
        ];

        let mut candidates: Vec<String> = Vec::with_capacity(ordered.len());
        for candidate in ordered.into_iter().flatten() {
            let normalized = candidate.trim().trim_end_matches('/');
            if !normalized.is_empty() && !candidates.iter().any(|c| c == normalized) {
                candidates.push(normalized.to_owned());
            }
        }
        candidates
    }

    /// Run `attempt` against each candidate until one succeeds
    ///
    /// Candidates are never retried within a pass. The first success is
    /// remembered as the last known good endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::EndpointUnreachable`] carrying the last
    /// failure when no candidate succeeds
    pub async fn resolve<T, F, Fut>(&self, override_url: Option<&str>, attempt: F) -> Result<Resolved<T>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.resolve_with(override_url, attempt, |_, value| Ok(value)).await
    }

    /// Like [`resolve`](Self::resolve), with `accept` run on the first
    /// answer before its endpoint is remembered
    ///
    /// An `accept` failure ends the pass; remaining candidates are not
    /// tried and the endpoint is not remembered.
    ///
    /// # Errors
    ///
    /// Returns the `accept` error as is, or
    /// [`SpeechError::EndpointUnreachable`] when no candidate answers
    pub async fn resolve_with<T, U, F, Fut, A>(
        &self,
        override_url: Option<&str>,
        mut attempt: F,
        accept: A,
    ) -> Result<Resolved<U>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
        A: FnOnce(&str, T) -> Result<U>,
    {
        let candidates = self.candidates(override_url);
        let attempts = candidates.len();
        let mut last: Option<Box<SpeechError>> = None;

        for endpoint in candidates {
            tracing::debug!(endpoint = %endpoint, "trying speech endpoint");

            match attempt(endpoint.clone()).await {
                Ok(answer) => {
                    let value = accept(&endpoint, answer)?;
                    self.remember(&endpoint);
                    return Ok(Resolved { endpoint, value });
                }
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "speech endpoint failed");
                    last = Some(Box::new(e));
                }
            }
        }

        tracing::error!(attempts, "no speech endpoint reachable");

        Err(SpeechError::EndpointUnreachable { attempts, last })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn fails_unless(good: &'static str, tried: &Mutex<Vec<String>>, endpoint: &str) -> Result<&'static str> {
        tried.lock().unwrap().push(endpoint.to_owned());
        if endpoint == good {
            Ok("audio")
        } else {
            Err(SpeechError::ProviderApiError {
                status: 503,
                message: format!("{endpoint} down"),
            })
        }
    }

    #[test]
    fn candidate_order_and_dedup() {
        let resolver = EndpointResolver::new("https://prod/", Some("http://localhost:5002".to_owned()));
        assert_eq!(
            resolver.candidates(Some("https://prod")),
            vec!["https://prod".to_owned(), "http://localhost:5002".to_owned()]
        );
        assert_eq!(
            resolver.candidates(Some("  ")),
            vec!["https://prod".to_owned(), "http://localhost:5002".to_owned()]
        );
    }

    #[tokio::test]
    async fn fails_over_and_remembers_winner() {
        let resolver = EndpointResolver::new("http://bad2", Some("http://good".to_owned()));
        let tried = Mutex::new(Vec::new());

        let resolved = resolver
            .resolve(Some("http://bad1"), |endpoint| {
                let result = fails_unless("http://good", &tried, &endpoint);
                async move { result }
            })
            .await
            .unwrap();

        assert_eq!(resolved.endpoint, "http://good");
        assert_eq!(resolved.value, "audio");
        assert_eq!(*tried.lock().unwrap(), vec!["http://bad1", "http://bad2", "http://good"]);
        assert_eq!(resolver.last_known_good().as_deref(), Some("http://good"));

        // Second pass goes straight to the remembered endpoint
        tried.lock().unwrap().clear();
        let resolved = resolver
            .resolve(None, |endpoint| {
                let result = fails_unless("http://good", &tried, &endpoint);
                async move { result }
            })
            .await
            .unwrap();

        assert_eq!(resolved.endpoint, "http://good");
        assert_eq!(*tried.lock().unwrap(), vec!["http://good"]);
    }

    #[tokio::test]
    async fn override_still_outranks_remembered_endpoint() {
        let resolver = EndpointResolver::new("http://good", None);
        let tried = Mutex::new(Vec::new());

        resolver
            .resolve(None, |endpoint| {
                let result = fails_unless("http://good", &tried, &endpoint);
                async move { result }
            })
            .await
            .unwrap();

        tried.lock().unwrap().clear();
        resolver
            .resolve(Some("http://override"), |endpoint| {
                let result = fails_unless("http://good", &tried, &endpoint);
                async move { result }
            })
            .await
            .unwrap();

        assert_eq!(*tried.lock().unwrap(), vec!["http://override", "http://good"]);
    }

    #[tokio::test]
    async fn all_candidates_failing_propagates_last_error() {
        let resolver = EndpointResolver::new("http://a", Some("http://b".to_owned()));
        let tried = Mutex::new(Vec::new());

        let err = resolver
            .resolve(None, |endpoint| {
                let result = fails_unless("http://never", &tried, &endpoint);
                async move { result }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::EndpointUnreachable { attempts: 2, .. }));
        let last = err.last_error().unwrap();
        assert!(last.to_string().contains("http://b down"));
        assert!(resolver.last_known_good().is_none());
        // Each candidate tried exactly once
        assert_eq!(tried.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rejected_answer_is_not_remembered() {
        let resolver = EndpointResolver::new("http://corrupt", Some("http://good".to_owned()));
        let tried = Mutex::new(Vec::new());

        let err = resolver
            .resolve_with(
                None,
                |endpoint| {
                    tried.lock().unwrap().push(endpoint);
                    async { Ok("garbled") }
                },
                |_, _| Err::<(), _>(SpeechError::DecodeError("bad base64".to_owned())),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SpeechError::DecodeError(_)));
        // No failover past a backend that answered
        assert_eq!(*tried.lock().unwrap(), vec!["http://corrupt"]);
        assert!(resolver.last_known_good().is_none());
    }
}
