//! Shared vocabulary for the visync engine
//!
//! Every other crate in the workspace speaks in these types: the closed
//! viseme vocabulary, speaker identifiers, the phoneme events produced by
//! a speech backend, and the run-length compressed timeline entries the
//! player consumes.

#![allow(clippy::must_use_candidate)]

mod hint;
mod phoneme;
mod speaker;
mod viseme;

pub use hint::{Emotion, SpeechContext};
pub use phoneme::{PhonemeEvent, TimelineEntry};
pub use speaker::SpeakerId;
pub use viseme::{VisemeClass, VisemeId, VisemeSet};
