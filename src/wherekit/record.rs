//! The record abstraction predicates are evaluated against.

use crate::key_path::KeyPath;
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Anything a predicate can be evaluated against.
///
/// Returning `None` means the field is missing; the engine treats a missing
/// field exactly like `Value::Null`.
pub trait Record {
    fn value_for(&self, key_path: &KeyPath) -> Option<Value>;
}

/// A persisted record type that stores can hold.
pub trait Entity: Record + Clone + Serialize + DeserializeOwned {
    /// Entity name used for request routing and storage file names.
    const NAME: &'static str;

    fn id(&self) -> Uuid;
}

/// Loose record keyed by field name. Nested paths are looked up verbatim,
/// so `"owner.name"` is a single key here.
pub type FieldMap = BTreeMap<String, Value>;

impl Record for FieldMap {
    fn value_for(&self, key_path: &KeyPath) -> Option<Value> {
        self.get(key_path.as_str()).cloned()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn value_for(&self, key_path: &KeyPath) -> Option<Value> {
        (**self).value_for(key_path)
    }
}
