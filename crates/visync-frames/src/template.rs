//! Asset path templates
//!
//! Placeholders: `{origin}`, `{local}`, `{speaker}`, `{viseme}` and
//! `{category}` (the viseme's vocabulary layer).

use visync_core::{SpeakerId, VisemeClass, VisemeId};

use crate::AssetRef;

/// Values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub origin: &'a str,
    pub local: &'a str,
    pub speaker: &'a SpeakerId,
    pub viseme: VisemeId,
}

/// Whether `template` only makes sense for layered (non-basic) visemes
pub fn uses_category(template: &str) -> bool {
    template.contains("{category}")
}

/// Whether `template` should be tried for `viseme`
pub fn applies_to(template: &str, viseme: VisemeId) -> bool {
    !uses_category(template) || viseme.class() != VisemeClass::Basic
}

pub fn expand(template: &str, ctx: &TemplateContext<'_>) -> AssetRef {
    let expanded = template
        .replace("{origin}", ctx.origin.trim_end_matches('/'))
        .replace("{local}", ctx.local.trim_end_matches('/'))
        .replace("{speaker}", ctx.speaker.as_str())
        .replace("{viseme}", ctx.viseme.as_ref())
        .replace("{category}", ctx.viseme.class().as_ref());

    AssetRef::parse(expanded)
}
