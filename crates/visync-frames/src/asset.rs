use std::{fmt, path::PathBuf};

/// Location of one frame image
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetRef {
    /// Served over HTTP(S)
    Remote(String),
    /// File on the local asset directory
    Local(PathBuf),
}

impl AssetRef {
    /// Classify an expanded template: absolute HTTP(S) URLs are remote,
    /// anything else is a filesystem path
    pub fn parse(location: impl Into<String>) -> Self {
        let location = location.into();
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Remote(location)
        } else {
            Self::Local(PathBuf::from(location))
        }
    }

    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
