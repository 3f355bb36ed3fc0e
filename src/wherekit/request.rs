//! Fetch, query and delete requests.
//!
//! A [`FetchRequest`] is the mutable target every clause is applied to. It
//! carries at most one predicate and one ordering; applying a second clause of
//! the same kind replaces the first (see [`crate::clauses::ApplyOutcome`]).

use crate::clauses::{ApplyOutcome, Clause, SortKey, Where};
use crate::record::Entity;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Return matching records.
    Fetch,
    /// Aggregate over matching records (counts).
    Query,
    /// Remove matching records.
    Delete,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Fetch => write!(f, "fetch"),
            RequestKind::Query => write!(f, "query"),
            RequestKind::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    entity: String,
    kind: RequestKind,
    predicate: Option<Where>,
    sort_keys: Vec<SortKey>,
    pub fetch_limit: Option<usize>,
    pub fetch_offset: usize,
}

impl FetchRequest {
    pub fn new(entity: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            entity: entity.into(),
            kind,
            predicate: None,
            sort_keys: Vec::new(),
            fetch_limit: None,
            fetch_offset: 0,
        }
    }

    pub fn fetch<T: Entity>() -> Self {
        Self::new(T::NAME, RequestKind::Fetch)
    }

    pub fn query<T: Entity>() -> Self {
        Self::new(T::NAME, RequestKind::Query)
    }

    pub fn delete<T: Entity>() -> Self {
        Self::new(T::NAME, RequestKind::Delete)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn predicate(&self) -> Option<&Where> {
        self.predicate.as_ref()
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// Replace the predicate without any diagnostics, returning the old one.
    pub fn set_predicate(&mut self, predicate: Option<Where>) -> Option<Where> {
        std::mem::replace(&mut self.predicate, predicate)
    }

    /// Replace the sort keys without any diagnostics, returning the old ones.
    pub fn set_sort_keys(&mut self, keys: Vec<SortKey>) -> Vec<SortKey> {
        std::mem::replace(&mut self.sort_keys, keys)
    }

    /// Apply a clause, reporting whether it overwrote existing state.
    pub fn apply<C: Clause + ?Sized>(&mut self, clause: &C) -> ApplyOutcome {
        clause.apply_to(self)
    }

    /// Builder form of [`FetchRequest::apply`] for call sites that do not care
    /// about overwrites.
    pub fn with<C: Clause + ?Sized>(mut self, clause: &C) -> Self {
        let _ = clause.apply_to(&mut self);
        self
    }
}
