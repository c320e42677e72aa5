use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_ASSET_ORIGIN: &str = "https://pub-16cb321dba5c429a8acbbacbc2f64d64.r2.dev";

/// Placeholders understood by asset path templates
pub const TEMPLATE_PLACEHOLDERS: &[&str] = &["origin", "local", "speaker", "viseme", "category"];

/// Avatar frame asset configuration
///
/// Templates are expanded per `(speaker, viseme)`; `{origin}` is the CDN
/// base, `{local}` the local asset directory and `{category}` the
/// vocabulary layer (templates using it only apply to non-basic visemes).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
    /// Probe the origin once before preloading
    #[serde(default = "default_true")]
    pub probe: bool,
    /// Switch the whole preload pass to `local_dir` when the probe fails
    #[serde(default = "default_true")]
    pub local_fallback: bool,
    /// Candidate frame paths in priority order
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,
    /// Paths tried by the connectivity probe
    #[serde(default = "default_probe_templates")]
    pub probe_templates: Vec<String>,
    /// Speaker default rest frame shown when nothing else is cached
    #[serde(default = "default_rest_template")]
    pub rest_template: String,
    /// Rest frame used instead once a preload fell back to `local_dir`
    #[serde(default = "default_local_rest_template")]
    pub local_rest_template: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            local_dir: default_local_dir(),
            probe: true,
            local_fallback: true,
            templates: default_templates(),
            probe_templates: default_probe_templates(),
            rest_template: default_rest_template(),
            local_rest_template: default_local_rest_template(),
        }
    }
}

fn default_origin() -> String {
    DEFAULT_ASSET_ORIGIN.to_string()
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("r2-upload-ready")
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_templates() -> Vec<String> {
    vec![
        "{origin}/avatars/{speaker}/2d/visemes/{category}/mouth_{viseme}.png".to_string(),
        "{origin}/avatars/{speaker}/full/{viseme}.png".to_string(),
        "{origin}/avatars/{speaker}/full/{viseme}/frame_01.webp".to_string(),
        "{local}/{speaker}/full/{viseme}.png".to_string(),
    ]
}

fn default_probe_templates() -> Vec<String> {
    vec![
        "{origin}/avatars/{speaker}/full/REST/frame_01.webp".to_string(),
        "{origin}/{speaker}/full/REST/frame_01.webp".to_string(),
    ]
}

fn default_rest_template() -> String {
    "{origin}/avatars/{speaker}/full/REST/frame_01.webp".to_string()
}

fn default_local_rest_template() -> String {
    "{local}/{speaker}/full/REST.png".to_string()
}
