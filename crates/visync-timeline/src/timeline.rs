use serde::Serialize;
use visync_core::{TimelineEntry, VisemeId};

/// Timelines up to this length are searched linearly
const LINEAR_SCAN_LIMIT: usize = 32;

/// Where a timeline's timing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineOrigin {
    /// Built from backend phoneme timing
    Phonemes,
    /// Synthesized from text length
    Heuristic,
}

/// Contiguous, sorted, run-length compressed viseme intervals for one
/// utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    origin: TimelineOrigin,
}

impl Timeline {
    pub(crate) const fn new(entries: Vec<TimelineEntry>, origin: TimelineOrigin) -> Self {
        Self { entries, origin }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TimelineEntry> {
        self.entries
    }

    pub const fn origin(&self) -> TimelineOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.entries.first().map_or(0.0, |e| e.start)
    }

    pub fn end(&self) -> f64 {
        self.entries.last().map_or(0.0, |e| e.end)
    }

    /// Sum of entry durations
    pub fn covered_duration(&self) -> f64 {
        self.entries.iter().map(TimelineEntry::duration).sum()
    }

    /// Viseme active at `time` (seconds), with its entry index
    ///
    /// Outside every entry, including before the first and at or after
    /// the last entry's end, this is [`VisemeId::Rest`] with no index.
    pub fn viseme_at(&self, time: f64) -> (VisemeId, Option<usize>) {
        let index = if self.entries.len() <= LINEAR_SCAN_LIMIT {
            self.entries.iter().position(|e| e.contains(time))
        } else {
            let after = self.entries.partition_point(|e| e.start <= time);
            after
                .checked_sub(1)
                .filter(|&i| self.entries[i].contains(time))
        };

        index.map_or((VisemeId::Rest, None), |i| (self.entries[i].viseme, Some(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_timeline(n: usize) -> Timeline {
        let cycle = [VisemeId::Mbp, VisemeId::A, VisemeId::E, VisemeId::I];
        let entries = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let (start, end) = (i as f64 * 0.1, (i + 1) as f64 * 0.1);
                TimelineEntry::new(cycle[i % cycle.len()], start, end)
            })
            .collect();
        Timeline::new(entries, TimelineOrigin::Phonemes)
    }

    #[test]
    fn outside_range_is_rest() {
        let timeline = Timeline::new(
            vec![
                TimelineEntry::new(VisemeId::A, 0.5, 1.0),
                TimelineEntry::new(VisemeId::Mbp, 1.0, 1.5),
            ],
            TimelineOrigin::Phonemes,
        );

        assert_eq!(timeline.viseme_at(0.0), (VisemeId::Rest, None));
        assert_eq!(timeline.viseme_at(0.49), (VisemeId::Rest, None));
        assert_eq!(timeline.viseme_at(1.5), (VisemeId::Rest, None));
        assert_eq!(timeline.viseme_at(99.0), (VisemeId::Rest, None));
        assert_eq!(timeline.viseme_at(-1.0), (VisemeId::Rest, None));
    }

    #[test]
    fn boundaries_belong_to_later_entry() {
        let timeline = Timeline::new(
            vec![
                TimelineEntry::new(VisemeId::A, 0.0, 0.2),
                TimelineEntry::new(VisemeId::Mbp, 0.2, 0.4),
            ],
            TimelineOrigin::Phonemes,
        );

        assert_eq!(timeline.viseme_at(0.0), (VisemeId::A, Some(0)));
        assert_eq!(timeline.viseme_at(0.2), (VisemeId::Mbp, Some(1)));
    }

    #[test]
    fn binary_search_agrees_with_linear_scan() {
        let timeline = long_timeline(200);
        assert!(timeline.len() > LINEAR_SCAN_LIMIT);

        for step in 0..2100 {
            let t = f64::from(step) * 0.01 - 0.5;
            let expected = timeline
                .entries()
                .iter()
                .position(|e| e.contains(t))
                .map_or((VisemeId::Rest, None), |i| (timeline.entries()[i].viseme, Some(i)));
            assert_eq!(timeline.viseme_at(t), expected, "t = {t}");
        }
    }

    #[test]
    fn empty_timeline_is_always_rest() {
        let timeline = Timeline::new(Vec::new(), TimelineOrigin::Heuristic);
        assert_eq!(timeline.viseme_at(0.0), (VisemeId::Rest, None));
        assert!((timeline.end() - 0.0).abs() < f64::EPSILON);
    }
}
