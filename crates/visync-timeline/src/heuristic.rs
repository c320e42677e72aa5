use visync_core::{TimelineEntry, VisemeId, VisemeSet};

use crate::timeline::{Timeline, TimelineOrigin};

const BASIC_CYCLE: &[VisemeId] = &[VisemeId::Mbp, VisemeId::A, VisemeId::E, VisemeId::I, VisemeId::Rest];
const ENHANCED_CYCLE: &[VisemeId] = &[
    VisemeId::Mbp,
    VisemeId::ATeach,
    VisemeId::ETeach,
    VisemeId::ITeach,
    VisemeId::Rest,
];

/// Shortest time a synthesized viseme is held, in seconds
pub const MIN_STEP: f64 = 0.08;
/// Longest time a synthesized viseme is held, in seconds
pub const MAX_STEP: f64 = 0.14;
/// Speaking rate used to estimate duration from text length
pub const CHARS_PER_SECOND: f64 = 13.0;
/// Floor for text-length duration estimates, in seconds
pub const MIN_ESTIMATED_DURATION: f64 = 1.5;
/// Upper bound on any duration the synthesizer will cover
pub const MAX_DURATION: f64 = 3600.0;

/// Fallback timeline generator for speech without phoneme timing
///
/// Cycles through a fixed "generic speaking" sequence ending on rest,
/// with the step size scaled to the text length. Approximate on purpose:
/// it keeps the face moving, nothing more.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicSynthesizer {
    cycle: &'static [VisemeId],
}

impl Default for HeuristicSynthesizer {
    fn default() -> Self {
        Self::new(VisemeSet::default())
    }
}

impl HeuristicSynthesizer {
    pub const fn new(set: VisemeSet) -> Self {
        let cycle = match set {
            VisemeSet::Basic => BASIC_CYCLE,
            VisemeSet::Enhanced => ENHANCED_CYCLE,
        };
        Self { cycle }
    }

    /// Duration to cover: the reported one when usable, otherwise an
    /// estimate from the character count
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate_duration(text: &str, reported: f64) -> f64 {
        let duration = if reported.is_finite() && reported > 0.0 {
            reported
        } else {
            MIN_ESTIMATED_DURATION.max(text.chars().count() as f64 / CHARS_PER_SECOND)
        };
        duration.min(MAX_DURATION)
    }

    /// Per-viseme hold time for `text` spread over `duration`
    #[allow(clippy::cast_precision_loss)]
    pub fn step(text: &str, duration: f64) -> f64 {
        let steps = (text.chars().count() as f64 / 6.0).round().max(8.0);
        (duration / steps).clamp(MIN_STEP, MAX_STEP)
    }

    pub fn synthesize(&self, text: &str, reported_duration: f64) -> Timeline {
        let duration = Self::estimate_duration(text, reported_duration);
        let step = Self::step(text, duration);

        let mut entries: Vec<TimelineEntry> = Vec::new();
        let mut t = 0.0;
        let mut idx = 0;
        while t < duration {
            let next = duration.min(t + step);
            entries.push(TimelineEntry::new(self.cycle[idx % self.cycle.len()], t, next));
            t = next;
            idx += 1;
        }

        end_on_rest(&mut entries);

        tracing::debug!(
            duration,
            step,
            entries = entries.len(),
            "synthesized heuristic timeline"
        );

        Timeline::new(entries, TimelineOrigin::Heuristic)
    }
}

/// Force the last entry to rest without creating two adjacent rests
fn end_on_rest(entries: &mut Vec<TimelineEntry>) {
    let Some(last) = entries.last() else {
        return;
    };
    if last.viseme.is_rest() {
        return;
    }

    let end = last.end;
    let len = entries.len();
    if len >= 2 && entries[len - 2].viseme.is_rest() {
        entries.pop();
        if let Some(previous) = entries.last_mut() {
            previous.end = end;
        }
    } else if let Some(last) = entries.last_mut() {
        last.viseme = VisemeId::Rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(timeline: &Timeline, duration: f64) {
        assert!(!timeline.is_empty());
        assert!((timeline.covered_duration() - duration).abs() < 1e-6);
        assert!((timeline.end() - duration).abs() < 1e-9);
        assert_eq!(timeline.entries().last().unwrap().viseme, VisemeId::Rest);
        for pair in timeline.entries().windows(2) {
            assert_ne!(pair[0].viseme, pair[1].viseme);
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
    }

    #[test]
    fn hello_there_without_duration() {
        let synthesizer = HeuristicSynthesizer::new(VisemeSet::Basic);
        let timeline = synthesizer.synthesize("Hello there", 0.0);

        // 11 chars at 13 cps is under the 1.5s floor
        let expected = HeuristicSynthesizer::estimate_duration("Hello there", 0.0);
        assert!((expected - 1.5).abs() < f64::EPSILON);
        assert_well_formed(&timeline, expected);
        assert_eq!(timeline.origin(), TimelineOrigin::Heuristic);
        assert_eq!(timeline.entries()[0].viseme, VisemeId::Mbp);
    }

    #[test]
    fn long_text_estimate_scales_with_length() {
        let text = "a".repeat(130);
        let duration = HeuristicSynthesizer::estimate_duration(&text, 0.0);
        assert!((duration - 10.0).abs() < 1e-9);

        let timeline = HeuristicSynthesizer::new(VisemeSet::Basic).synthesize(&text, 0.0);
        assert_well_formed(&timeline, 10.0);
    }

    #[test]
    fn reported_duration_wins() {
        let timeline = HeuristicSynthesizer::new(VisemeSet::Enhanced).synthesize("Hi", 2.37);
        assert_well_formed(&timeline, 2.37);
        assert_eq!(timeline.entries()[1].viseme, VisemeId::ATeach);
    }

    #[test]
    fn step_is_clamped() {
        assert!((HeuristicSynthesizer::step("short", 100.0) - MAX_STEP).abs() < f64::EPSILON);
        assert!((HeuristicSynthesizer::step(&"x".repeat(600), 1.0) - MIN_STEP).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_durations_terminate() {
        let synthesizer = HeuristicSynthesizer::default();
        for reported in [f64::NAN, f64::INFINITY, -3.0, 0.0, 0.01] {
            let timeline = synthesizer.synthesize("Hello", reported);
            let expected = HeuristicSynthesizer::estimate_duration("Hello", reported);
            assert_well_formed(&timeline, expected);
        }
    }

    #[test]
    fn tiny_duration_is_single_rest() {
        let timeline = HeuristicSynthesizer::new(VisemeSet::Basic).synthesize("Hello", 0.05);
        assert_eq!(timeline.entries(), &[TimelineEntry::new(VisemeId::Rest, 0.0, 0.05)]);
    }
}
