use std::path::Path;

use regex::Regex;

use crate::{Config, TEMPLATE_PLACEHOLDERS};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads and parses the file, applies `VISYNC_*` environment
    /// overrides, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let mut config: Self = toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults
    ///
    /// Environment overrides and validation apply either way.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is invalid or the resulting
    /// configuration fails validation
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::debug!(path = %path.display(), "no config file, using defaults");

        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if an address does not parse, a duration string
    /// is invalid, an asset template uses an unknown placeholder, or the
    /// frame rate is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_speech_config()?;
        self.validate_assets_config()?;
        self.validate_player_config()?;
        Ok(())
    }

    fn validate_speech_config(&self) -> anyhow::Result<()> {
        let speech = &self.speech;

        if speech.production_url.trim().is_empty() {
            anyhow::bail!("speech.production_url must not be empty");
        }

        validate_url("speech.production_url", &speech.production_url)?;
        if let Some(ref url) = speech.endpoint_override {
            validate_url("speech.endpoint_override", url)?;
        }
        if let Some(ref url) = speech.local_url {
            validate_url("speech.local_url", url)?;
        }

        if !speech.path.starts_with('/') {
            anyhow::bail!("speech.path must start with '/': `{}`", speech.path);
        }

        duration_str::parse(&speech.timeout)
            .map_err(|e| anyhow::anyhow!("invalid speech.timeout '{}': {e}", speech.timeout))?;

        Ok(())
    }

    fn validate_assets_config(&self) -> anyhow::Result<()> {
        validate_url("assets.origin", &self.assets.origin)?;

        if self.assets.templates.is_empty() {
            anyhow::bail!("assets.templates must list at least one path");
        }

        let templates = self
            .assets
            .templates
            .iter()
            .chain(&self.assets.probe_templates)
            .chain([&self.assets.rest_template, &self.assets.local_rest_template]);

        for template in templates {
            validate_template(template)?;
        }

        Ok(())
    }

    fn validate_player_config(&self) -> anyhow::Result<()> {
        if !(1..=240).contains(&self.player.frame_rate) {
            anyhow::bail!("player.frame_rate must be between 1 and 240, got {}", self.player.frame_rate);
        }

        if self.player.default_speaker.trim().is_empty() {
            anyhow::bail!("player.default_speaker must not be empty");
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> anyhow::Result<()> {
    url::Url::parse(value).map_err(|e| anyhow::anyhow!("invalid {field} `{value}`: {e}"))?;
    Ok(())
}

fn validate_template(template: &str) -> anyhow::Result<()> {
    let placeholder = Regex::new(r"\{([^{}]*)\}").expect("must be valid regex");

    for captures in placeholder.captures_iter(template) {
        let name = &captures[1];
        if !TEMPLATE_PLACEHOLDERS.contains(&name) {
            anyhow::bail!("unknown placeholder `{{{name}}}` in asset template `{template}`");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use visync_core::VisemeSet;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [speech]
            production_url = "https://tts.example.com"
            local_url = "http://localhost:5002"
            timeout = "10s"

            [assets]
            origin = "https://cdn.example.com"

            [player]
            viseme_set = "basic"
            frame_rate = 30

            [telemetry]
            log_filter = "visync=debug"
            "#
        )
        .unwrap();

        temp_env::with_vars_unset([crate::ENV_TTS_URL, crate::ENV_ASSET_ORIGIN, crate::ENV_LOG], || {
            let config = Config::load(file.path()).unwrap();
            assert_eq!(config.speech.production_url, "https://tts.example.com");
            assert_eq!(config.speech.local_url.as_deref(), Some("http://localhost:5002"));
            assert_eq!(config.assets.origin, "https://cdn.example.com");
            assert_eq!(config.player.viseme_set, VisemeSet::Basic);
            assert_eq!(config.player.frame_rate, 30);
            assert_eq!(config.telemetry.log_filter, "visync=debug");
        });
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<Config, _> = toml::from_str("[speech]\nvoice = \"alloy\"");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        temp_env::with_vars_unset([crate::ENV_TTS_URL, crate::ENV_ASSET_ORIGIN, crate::ENV_LOG], || {
            let config = Config::load_or_default(Path::new("/nonexistent/visync.toml")).unwrap();
            assert_eq!(config.speech.production_url, crate::DEFAULT_PRODUCTION_URL);
        });
    }

    #[test]
    fn bad_url_rejected() {
        let mut config = Config::default();
        config.speech.endpoint_override = Some("not a url".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("speech.endpoint_override"));
    }

    #[test]
    fn bad_timeout_rejected() {
        let mut config = Config::default();
        config.speech.timeout = "soon".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_placeholder_rejected() {
        let mut config = Config::default();
        config.assets.templates.push("{origin}/{avatar}/{viseme}.png".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{avatar}"));
    }

    #[test]
    fn frame_rate_bounds() {
        let mut config = Config::default();
        config.player.frame_rate = 0;
        assert!(config.validate().is_err());
        config.player.frame_rate = 240;
        assert!(config.validate().is_ok());
    }
}
