use super::{ApplyOutcome, Clause};
use crate::key_path::KeyPath;
use crate::request::FetchRequest;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub key_path: KeyPath,
    pub ascending: bool,
}

impl SortKey {
    pub fn new(key_path: impl Into<KeyPath>, ascending: bool) -> Self {
        Self {
            key_path: key_path.into(),
            ascending,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.ascending { "ASC" } else { "DESC" };
        write!(f, "{} {}", self.key_path, dir)
    }
}

/// Sort keys for a request, most significant first.
///
/// ```
/// use wherekit::OrderBy;
///
/// let order = OrderBy::descending("hue").then_ascending("color_name");
/// assert_eq!(order.to_string(), "hue DESC, color_name ASC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    keys: Vec<SortKey>,
}

impl OrderBy {
    pub fn ascending(key_path: impl Into<KeyPath>) -> Self {
        Self {
            keys: vec![SortKey::new(key_path, true)],
        }
    }

    pub fn descending(key_path: impl Into<KeyPath>) -> Self {
        Self {
            keys: vec![SortKey::new(key_path, false)],
        }
    }

    pub fn then_ascending(mut self, key_path: impl Into<KeyPath>) -> Self {
        self.keys.push(SortKey::new(key_path, true));
        self
    }

    pub fn then_descending(mut self, key_path: impl Into<KeyPath>) -> Self {
        self.keys.push(SortKey::new(key_path, false));
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl Clause for OrderBy {
    fn apply_to(&self, request: &mut FetchRequest) -> ApplyOutcome {
        let previous = request.set_sort_keys(self.keys.clone());
        if previous.is_empty() || previous == self.keys {
            return ApplyOutcome::Applied;
        }
        tracing::warn!(
            entity = request.entity(),
            kind = %request.kind(),
            replacement = %self,
            "Existing sort keys overwritten by OrderBy clause"
        );
        ApplyOutcome::ReplacedSortKeys { previous }
    }
}
