//! Programmatic configuration builder for integration tests

use std::path::Path;

use visync_config::Config;
use visync_core::VisemeSet;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Basic viseme set, no local speech backend, fast frame rate
    pub fn new() -> Self {
        let mut config = Config::default();
        config.speech.local_url = None;
        config.speech.timeout = "5s".to_owned();
        config.player.viseme_set = VisemeSet::Basic;
        config.player.frame_rate = 200;
        Self { config }
    }

    pub fn with_production_url(mut self, url: &str) -> Self {
        self.config.speech.production_url = url.to_owned();
        self
    }

    pub fn with_local_url(mut self, url: &str) -> Self {
        self.config.speech.local_url = Some(url.to_owned());
        self
    }

    pub fn with_asset_origin(mut self, origin: &str) -> Self {
        self.config.assets.origin = origin.to_owned();
        self
    }

    pub fn with_local_dir(mut self, dir: &Path) -> Self {
        self.config.assets.local_dir = dir.to_path_buf();
        self
    }

    pub fn build(self) -> Config {
        self.config.validate().expect("test config must validate");
        self.config
    }
}
