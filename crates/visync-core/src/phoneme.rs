use serde::{Deserialize, Serialize};

use crate::VisemeId;

/// One time-stamped speech sound reported by the speech backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeEvent {
    /// Start time in seconds from the beginning of the audio
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub viseme: VisemeId,
    /// Source text fragment this sound belongs to, empty if unknown
    #[serde(default)]
    pub text: String,
}

impl PhonemeEvent {
    pub fn new(start: f64, end: f64, viseme: VisemeId, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            viseme,
            text: text.into(),
        }
    }
}

/// A run of one viseme over `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub viseme: VisemeId,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

impl TimelineEntry {
    pub const fn new(viseme: VisemeId, start: f64, end: f64) -> Self {
        Self {
            viseme,
            start,
            end,
            source_text: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open interval membership
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

impl From<&TimelineEntry> for PhonemeEvent {
    fn from(entry: &TimelineEntry) -> Self {
        Self {
            start: entry.start,
            end: entry.end,
            viseme: entry.viseme,
            text: entry.source_text.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_half_open() {
        let entry = TimelineEntry::new(VisemeId::A, 0.2, 0.4);
        assert!(entry.contains(0.2));
        assert!(entry.contains(0.399));
        assert!(!entry.contains(0.4));
        assert!(!TimelineEntry::new(VisemeId::A, 0.2, 0.2).contains(0.2));
    }

    #[test]
    fn phoneme_text_defaults_to_empty() {
        let event: PhonemeEvent = serde_json::from_str(r#"{"start":0.0,"end":0.1,"viseme":"MBP"}"#).unwrap();
        assert_eq!(event.viseme, VisemeId::Mbp);
        assert!(event.text.is_empty());
    }
}
