use std::borrow::Cow;
use std::fmt;

/// A reference to a field on a record, possibly nested (`owner.name`).
///
/// Entities expose typed references as constants:
///
/// ```
/// use wherekit::KeyPath;
///
/// pub const HUE: KeyPath = KeyPath::from_static("hue");
/// assert_eq!(HUE.as_str(), "hue");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Cow<'static, str>);

impl KeyPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(Cow::Owned(path.into()))
    }

    pub const fn from_static(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        Self(Cow::Owned(path))
    }
}

impl From<&KeyPath> for KeyPath {
    fn from(path: &KeyPath) -> Self {
        path.clone()
    }
}
