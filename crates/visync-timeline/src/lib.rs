//! Viseme timelines
//!
//! Turns a backend phoneme stream into a run-length compressed sequence
//! of viseme intervals ([`TimelineBuilder`]), or, when the backend sent no
//! timing data, synthesizes a plausible speaking cycle sized to the
//! utterance ([`HeuristicSynthesizer`]). [`Timeline::viseme_at`] answers
//! "which mouth shape is audible at time t".

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod builder;
mod error;
mod heuristic;
mod refine;
mod timeline;

pub use builder::TimelineBuilder;
pub use error::{Result, TimelineError};
pub use heuristic::HeuristicSynthesizer;
pub use refine::{RefinementHints, TextCues};
pub use timeline::{Timeline, TimelineOrigin};

use visync_core::PhonemeEvent;

/// Build a timeline from phonemes when there are any, otherwise fall back
/// to the heuristic cycle for `text`
///
/// `reported_duration` is the backend's duration in seconds (0 when it
/// did not report one).
pub fn plan(
    builder: &TimelineBuilder,
    synthesizer: &HeuristicSynthesizer,
    phonemes: &[PhonemeEvent],
    text: &str,
    reported_duration: f64,
) -> Timeline {
    match builder.build(phonemes) {
        Ok(timeline) => timeline,
        Err(TimelineError::NoPhonemes) => {
            tracing::debug!(chars = text.chars().count(), "no phoneme timing, using heuristic timeline");
            synthesizer.synthesize(text, reported_duration)
        }
    }
}
