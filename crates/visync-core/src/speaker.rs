use std::fmt;

use serde::{Deserialize, Serialize};

/// Avatar speaker identifier (`kelly`, `ken`, ...)
///
/// Normalised to trimmed lower case on construction so it can be used
/// directly as a cache key and a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SpeakerId(String);

impl SpeakerId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SpeakerId {
    fn default() -> Self {
        Self::new("kelly")
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SpeakerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SpeakerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<SpeakerId> for String {
    fn from(value: SpeakerId) -> Self {
        value.0
    }
}

impl AsRef<str> for SpeakerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
