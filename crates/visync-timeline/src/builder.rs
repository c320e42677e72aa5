use visync_core::{PhonemeEvent, TimelineEntry, VisemeId, VisemeSet};

use crate::{
    Result, TimelineError,
    refine::{RefinementHints, refine},
    timeline::{Timeline, TimelineOrigin},
};

/// Converts a phoneme stream into a run-length compressed timeline
///
/// With [`VisemeSet::Enhanced`] every vowel is first refined using the
/// emotional/contextual cues in its source text; with
/// [`VisemeSet::Basic`] the backend's viseme is used as reported.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    set: VisemeSet,
    hints: RefinementHints,
}

impl TimelineBuilder {
    pub fn new(set: VisemeSet) -> Self {
        Self {
            set,
            hints: RefinementHints::default(),
        }
    }

    #[must_use]
    pub const fn with_hints(mut self, hints: RefinementHints) -> Self {
        self.hints = hints;
        self
    }

    pub const fn viseme_set(&self) -> VisemeSet {
        self.set
    }

    /// The viseme a single event contributes to the timeline
    pub fn effective_viseme(&self, event: &PhonemeEvent) -> VisemeId {
        if self.set.refines() {
            refine(event.viseme, &event.text, self.hints)
        } else {
            event.viseme
        }
    }

    /// Group consecutive events that share an effective viseme
    ///
    /// Events are ordered by start time first (stable for equal starts).
    /// Gaps between events are absorbed by holding the previous shape and
    /// overlaps are clipped, so the output is always contiguous over
    /// `[first.start, last.end]`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::NoPhonemes`] when `events` contains no
    /// event with finite timing.
    pub fn build(&self, events: &[PhonemeEvent]) -> Result<Timeline> {
        let mut ordered: Vec<&PhonemeEvent> = events
            .iter()
            .filter(|event| {
                let valid = event.start.is_finite() && event.end.is_finite();
                if !valid {
                    tracing::debug!(start = event.start, end = event.end, "skipping phoneme with invalid timing");
                }
                valid
            })
            .collect();
        ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut entries: Vec<TimelineEntry> = Vec::with_capacity(ordered.len());

        for event in ordered {

            let viseme = self.effective_viseme(event);
            let end = event.end.max(event.start);

            match entries.last_mut() {
                Some(current) if current.viseme == viseme => {
                    current.end = current.end.max(end);
                }
                Some(current) => {
                    if event.start > current.end {
                        current.end = event.start;
                    }
                    let start = current.end;
                    entries.push(entry(viseme, start, end.max(start), &event.text));
                }
                None => entries.push(entry(viseme, event.start, end, &event.text)),
            }
        }

        if entries.is_empty() {
            return Err(TimelineError::NoPhonemes);
        }

        tracing::debug!(events = events.len(), entries = entries.len(), "built viseme timeline");

        Ok(Timeline::new(entries, TimelineOrigin::Phonemes))
    }
}

fn entry(viseme: VisemeId, start: f64, end: f64, text: &str) -> TimelineEntry {
    TimelineEntry {
        viseme,
        start,
        end,
        source_text: (!text.is_empty()).then(|| text.to_owned()),
    }
}
