use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Emotional colouring applied to vowel shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Emotion {
    Happy,
    Serious,
    Excited,
}

impl Emotion {
    /// Suffix used to compose the refined viseme tag
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Happy => "HAPPY",
            Self::Serious => "SERIOUS",
            Self::Excited => "EXCITED",
        }
    }
}

/// Delivery context applied to vowel shapes when no emotion is present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpeechContext {
    #[default]
    #[strum(to_string = "teaching", serialize = "teach", serialize = "default")]
    Teaching,
    Question,
    Emphasis,
}

impl SpeechContext {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Teaching => "TEACH",
            Self::Question => "QUESTION",
            Self::Emphasis => "EMPHASIS",
        }
    }
}
