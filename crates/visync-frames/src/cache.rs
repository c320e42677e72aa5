use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use visync_config::AssetsConfig;
use visync_core::{SpeakerId, VisemeId, VisemeSet};

use crate::{
    AssetRef,
    loader::{AssetLoader, HttpAssetLoader},
    template::{self, TemplateContext},
};

/// Cache key: one frame per speaker and viseme
pub type FrameKey = (SpeakerId, VisemeId);

/// Outcome of one preload pass
#[derive(Debug, Clone)]
pub struct PreloadReport {
    pub speaker: SpeakerId,
    /// Origin substituted for `{origin}` during the pass
    pub origin: String,
    /// The probe failed and the pass ran against the local directory
    pub local_fallback: bool,
    /// Frames cached for the requested set after the pass
    pub loaded: usize,
    /// Visemes left without a frame
    pub missing: Vec<VisemeId>,
}

/// Memoized per-speaker frame assets
///
/// Entries are never evicted; the key space is bounded by the vocabulary
/// size times the number of speakers.
pub struct FrameCache {
    loader: Arc<dyn AssetLoader>,
    config: AssetsConfig,
    frames: DashMap<FrameKey, AssetRef>,
    /// Origin chosen by the last preload of each speaker
    origins: DashMap<SpeakerId, OriginChoice>,
}

#[derive(Debug, Clone)]
struct OriginChoice {
    origin: String,
    local_fallback: bool,
}

impl FrameCache {
    pub fn new(config: AssetsConfig) -> Self {
        Self::with_loader(config, Arc::new(HttpAssetLoader::new()))
    }

    pub fn with_loader(config: AssetsConfig, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            config,
            frames: DashMap::new(),
            origins: DashMap::new(),
        }
    }

    fn local_dir(&self) -> String {
        self.config.local_dir.to_string_lossy().into_owned()
    }

    /// Warm every viseme of `set` for `speaker`
    ///
    /// Never fails: visemes whose candidates are all exhausted are left
    /// unset and render as the rest frame.
    pub async fn preload(&self, speaker: &SpeakerId, set: VisemeSet) -> PreloadReport {
        let local = self.local_dir();
        let (origin, local_fallback) = self.select_origin(speaker, &local).await;
        self.origins.insert(
            speaker.clone(),
            OriginChoice {
                origin: origin.clone(),
                local_fallback,
            },
        );

        let pending: Vec<VisemeId> = set
            .visemes()
            .filter(|viseme| !self.frames.contains_key(&(speaker.clone(), *viseme)))
            .collect();

        let found = join_all(
            pending
                .iter()
                .map(|viseme| self.load_first(speaker, *viseme, &origin, &local)),
        )
        .await;

        let mut missing = Vec::new();
        for (viseme, asset) in pending.into_iter().zip(found) {
            match asset {
                Some(asset) => {
                    self.frames.insert((speaker.clone(), viseme), asset);
                }
                None => missing.push(viseme),
            }
        }

        let loaded = set.len() - missing.len();

        tracing::info!(
            speaker = %speaker,
            loaded,
            missing = missing.len(),
            local_fallback,
            "frame preload complete"
        );

        PreloadReport {
            speaker: speaker.clone(),
            origin,
            local_fallback,
            loaded,
            missing,
        }
    }

    /// Probe the configured origin and pick the origin for this pass
    async fn select_origin(&self, speaker: &SpeakerId, local: &str) -> (String, bool) {
        if !self.config.probe || self.probe(speaker, local).await {
            return (self.config.origin.clone(), false);
        }

        if self.config.local_fallback {
            tracing::warn!(
                origin = %self.config.origin,
                local,
                "asset origin unreachable, preloading from local directory"
            );
            (local.to_owned(), true)
        } else {
            tracing::warn!(origin = %self.config.origin, "asset origin unreachable");
            (self.config.origin.clone(), false)
        }
    }

    async fn probe(&self, speaker: &SpeakerId, local: &str) -> bool {
        let ctx = TemplateContext {
            origin: &self.config.origin,
            local,
            speaker,
            viseme: VisemeId::Rest,
        };

        for probe in &self.config.probe_templates {
            let asset = template::expand(probe, &ctx);
            match self.loader.load(&asset).await {
                Ok(()) => {
                    tracing::debug!(asset = %asset, "asset origin reachable");
                    return true;
                }
                Err(e) => tracing::debug!(asset = %asset, error = %e, "asset probe failed"),
            }
        }

        false
    }

    /// First candidate path for `viseme` that loads
    async fn load_first(&self, speaker: &SpeakerId, viseme: VisemeId, origin: &str, local: &str) -> Option<AssetRef> {
        let ctx = TemplateContext {
            origin,
            local,
            speaker,
            viseme,
        };

        let mut tried: Vec<AssetRef> = Vec::with_capacity(self.config.templates.len());
        for candidate in &self.config.templates {
            if !template::applies_to(candidate, viseme) {
                continue;
            }

            let asset = template::expand(candidate, &ctx);
            if tried.contains(&asset) {
                continue;
            }

            match self.loader.load(&asset).await {
                Ok(()) => return Some(asset),
                Err(e) => {
                    tracing::debug!(asset = %asset, error = %e, "frame candidate failed");
                    tried.push(asset);
                }
            }
        }

        tracing::warn!(speaker = %speaker, viseme = %viseme, "no frame asset found");
        None
    }

    /// Cached frame for exactly this key
    pub fn get(&self, speaker: &SpeakerId, viseme: VisemeId) -> Option<AssetRef> {
        self.frames
            .get(&(speaker.clone(), viseme))
            .map(|entry| entry.value().clone())
    }

    /// Frame to display for `viseme`
    ///
    /// Falls back to the cached rest frame, then to the speaker's default
    /// rest asset.
    pub fn frame_for(&self, speaker: &SpeakerId, viseme: VisemeId) -> AssetRef {
        self.get(speaker, viseme)
            .or_else(|| self.get(speaker, VisemeId::Rest))
            .unwrap_or_else(|| self.default_rest(speaker))
    }

    /// Speaker default rest asset
    ///
    /// Uses the local rest template once a preload of `speaker` fell back
    /// to the local directory, the rest template otherwise.
    pub fn default_rest(&self, speaker: &SpeakerId) -> AssetRef {
        let choice = self.origins.get(speaker).map(|entry| entry.value().clone());
        let (origin, template) = match choice {
            Some(OriginChoice {
                origin,
                local_fallback: true,
            }) => (origin, &self.config.local_rest_template),
            Some(OriginChoice { origin, .. }) => (origin, &self.config.rest_template),
            None => (self.config.origin.clone(), &self.config.rest_template),
        };
        let local = self.local_dir();

        template::expand(
            template,
            &TemplateContext {
                origin: &origin,
                local: &local,
                speaker,
                viseme: VisemeId::Rest,
            },
        )
    }

    /// Total cached frames across speakers
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Cached frames for one speaker
    pub fn speaker_len(&self, speaker: &SpeakerId) -> usize {
        self.frames.iter().filter(|entry| &entry.key().0 == speaker).count()
    }
}
