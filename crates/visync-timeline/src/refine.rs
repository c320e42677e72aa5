//! Emotional and contextual refinement of vowel visemes
//!
//! Keyword and punctuation sniffing over the text fragment attached to a
//! phoneme event. The precedence is fixed: emotion, then question, then
//! emphasis, then the teaching default.

use std::sync::OnceLock;

use regex::Regex;
use visync_core::{Emotion, SpeechContext, VisemeId};

/// Keyword lists checked in this order; the first list with a hit wins
const EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Happy,
        &["great", "wonderful", "amazing", "excellent", "fantastic", "awesome"],
    ),
    (
        Emotion::Serious,
        &["important", "critical", "serious", "careful", "attention", "warning"],
    ),
    (
        Emotion::Excited,
        &["wow", "incredible", "unbelievable", "amazing", "fantastic", "wonderful"],
    ),
];

const EMPHASIS_MARKERS: &[&str] = &["!", "\"", "**", "__"];

fn wh_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:what|how|why|when|where|who|which)\b").expect("must be valid regex"))
}

/// Caller-supplied hints for a whole utterance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefinementHints {
    /// Used when the text itself carries no emotional vocabulary
    pub emotion: Option<Emotion>,
    /// `Question` and `Emphasis` count as detected markers
    pub context: Option<SpeechContext>,
}

/// What the text heuristics found in one fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCues {
    pub emotion: Option<Emotion>,
    pub question: bool,
    pub emphasis: bool,
}

impl TextCues {
    pub fn analyze(text: &str) -> Self {
        let lower = text.to_lowercase();

        let emotion = EMOTION_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(emotion, _)| *emotion);

        Self {
            emotion,
            question: text.contains('?') || wh_word().is_match(text),
            emphasis: EMPHASIS_MARKERS.iter().any(|m| text.contains(m)),
        }
    }

    /// Merge utterance-level hints into the detected cues
    #[must_use]
    pub fn with_hints(mut self, hints: RefinementHints) -> Self {
        self.emotion = self.emotion.or(hints.emotion);
        match hints.context {
            Some(SpeechContext::Question) => self.question = true,
            Some(SpeechContext::Emphasis) => self.emphasis = true,
            Some(SpeechContext::Teaching) | None => {}
        }
        self
    }

    /// Suffix of the single refinement these cues select
    pub fn suffix(self) -> &'static str {
        if let Some(emotion) = self.emotion {
            emotion.suffix()
        } else if self.question {
            SpeechContext::Question.suffix()
        } else if self.emphasis {
            SpeechContext::Emphasis.suffix()
        } else {
            SpeechContext::Teaching.suffix()
        }
    }
}

/// Refine a vowel viseme using the cues in `text`
///
/// Non-vowel visemes pass through unchanged, as does any vowel whose
/// refined tag is not in the vocabulary.
pub(crate) fn refine(base: VisemeId, text: &str, hints: RefinementHints) -> VisemeId {
    if !base.is_vowel_base() {
        return base;
    }

    let suffix = TextCues::analyze(text).with_hints(hints).suffix();
    base.refined(suffix).unwrap_or(base)
}
