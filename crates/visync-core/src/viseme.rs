use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Mouth shape tag over the closed viseme vocabulary
///
/// The string form of every variant is its wire name (`REST`, `MBP`,
/// `A_HAPPY`, ...). Parsing is case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VisemeId {
    // basic
    Rest,
    Mbp,
    Fv,
    Th,
    Dntl,
    Kg,
    S,
    Wq,
    R,
    A,
    E,
    I,
    // enhanced
    Oo,
    Uh,
    Aw,
    Ay,
    Oy,
    Ng,
    Ch,
    Sh,
    Zh,
    Y,
    L,
    H,
    // emotional
    AHappy,
    ASerious,
    AExcited,
    EHappy,
    ESerious,
    EExcited,
    IHappy,
    ISerious,
    IExcited,
    // contextual
    ATeach,
    AQuestion,
    AEmphasis,
    ETeach,
    EQuestion,
    EEmphasis,
    ITeach,
    IQuestion,
    IEmphasis,
}

/// Which layer of the vocabulary a viseme belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum VisemeClass {
    Basic,
    Enhanced,
    Emotional,
    Contextual,
}

impl VisemeId {
    /// Parse a backend-supplied tag, falling back to [`VisemeId::Rest`]
    /// for anything outside the vocabulary
    pub fn from_wire(tag: &str) -> Self {
        tag.trim().parse().unwrap_or(Self::Rest)
    }

    /// Vocabulary layer of this viseme
    pub const fn class(self) -> VisemeClass {
        match self {
            Self::Rest
            | Self::Mbp
            | Self::Fv
            | Self::Th
            | Self::Dntl
            | Self::Kg
            | Self::S
            | Self::Wq
            | Self::R
            | Self::A
            | Self::E
            | Self::I => VisemeClass::Basic,
            Self::Oo
            | Self::Uh
            | Self::Aw
            | Self::Ay
            | Self::Oy
            | Self::Ng
            | Self::Ch
            | Self::Sh
            | Self::Zh
            | Self::Y
            | Self::L
            | Self::H => VisemeClass::Enhanced,
            Self::AHappy
            | Self::ASerious
            | Self::AExcited
            | Self::EHappy
            | Self::ESerious
            | Self::EExcited
            | Self::IHappy
            | Self::ISerious
            | Self::IExcited => VisemeClass::Emotional,
            Self::ATeach
            | Self::AQuestion
            | Self::AEmphasis
            | Self::ETeach
            | Self::EQuestion
            | Self::EEmphasis
            | Self::ITeach
            | Self::IQuestion
            | Self::IEmphasis => VisemeClass::Contextual,
        }
    }

    /// Whether this is one of the vowel shapes that accept emotional or
    /// contextual refinement
    pub const fn is_vowel_base(self) -> bool {
        matches!(self, Self::A | Self::E | Self::I)
    }

    pub const fn is_rest(self) -> bool {
        matches!(self, Self::Rest)
    }

    /// Look up the `{self}_{suffix}` variant by name
    ///
    /// Returns `None` when the composed tag is not part of the vocabulary.
    pub fn refined(self, suffix: &str) -> Option<Self> {
        format!("{self}_{suffix}").parse().ok()
    }
}

/// Which slice of the vocabulary an engine instance works with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VisemeSet {
    /// The twelve basic mouth shapes
    Basic,
    /// Basic plus the enhanced consonant/diphthong shapes and the
    /// emotional/contextual vowel refinements
    #[default]
    Enhanced,
}

impl VisemeSet {
    pub const fn contains(self, viseme: VisemeId) -> bool {
        match self {
            Self::Basic => matches!(viseme.class(), VisemeClass::Basic),
            Self::Enhanced => true,
        }
    }

    /// All visemes in this set, in vocabulary order
    pub fn visemes(self) -> impl Iterator<Item = VisemeId> {
        VisemeId::iter().filter(move |v| self.contains(*v))
    }

    pub fn len(self) -> usize {
        self.visemes().count()
    }

    /// Whether the builder refines vowels for this set
    pub const fn refines(self) -> bool {
        matches!(self, Self::Enhanced)
    }
}
