//! # Storage Layer
//!
//! Records live behind the [`DataStore`] trait, generic over the [`Entity`]
//! type. Backends only provide raw record access; request execution
//! (filtering, sorting, paging) is shared and happens in [`execute`].
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one pretty-printed JSON array per entity,
//!   `<root>/<Entity>.json`.
//! - [`memory::InMemoryStore`]: no persistence, used by tests.
//!
//! ## Execution
//!
//! 1. The request's predicate is compiled once. A malformed format string
//!    fails the whole request here.
//! 2. Every record is evaluated against it; evaluation errors abort.
//! 3. Matches are sorted by the sort keys. Nil sorts first ascending.
//! 4. `fetch_offset` records are skipped, then at most `fetch_limit` kept.

use crate::clauses::Where;
use crate::engine;
use crate::error::{Result, WherekitError};
use crate::record::Entity;
use crate::request::{FetchRequest, RequestKind};
use crate::value::Value;
use std::cmp::Ordering;
use uuid::Uuid;

pub mod fs;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

/// Abstract interface for record storage.
pub trait DataStore<T: Entity> {
    /// Save a record, replacing any existing one with the same id.
    fn insert(&mut self, record: T) -> Result<()>;

    fn get(&self, id: &Uuid) -> Result<T>;

    /// Every stored record, in storage order.
    fn all(&self) -> Result<Vec<T>>;

    /// Remove the given records, returning how many existed.
    fn remove(&mut self, ids: &[Uuid]) -> Result<usize>;

    /// Remove everything, returning how many records were dropped.
    fn clear(&mut self) -> Result<usize>;

    /// Records matching a fetch or query request.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<T>> {
        check_request::<T>(request, &[RequestKind::Fetch, RequestKind::Query])?;
        execute(self.all()?, request)
    }

    fn count(&self, request: &FetchRequest) -> Result<usize> {
        Ok(self.fetch(request)?.len())
    }

    /// Remove every record matching a delete request and return them.
    fn delete(&mut self, request: &FetchRequest) -> Result<Vec<T>> {
        check_request::<T>(request, &[RequestKind::Delete])?;
        let matched = execute(self.all()?, request)?;
        let ids: Vec<Uuid> = matched.iter().map(|r| r.id()).collect();
        self.remove(&ids)?;
        Ok(matched)
    }
}

fn check_request<T: Entity>(request: &FetchRequest, kinds: &[RequestKind]) -> Result<()> {
    if request.entity() != T::NAME {
        return Err(WherekitError::Store(format!(
            "Request for entity {} sent to a {} store",
            request.entity(),
            T::NAME
        )));
    }
    if !kinds.contains(&request.kind()) {
        return Err(WherekitError::Store(format!(
            "A {} request cannot be executed here",
            request.kind()
        )));
    }
    Ok(())
}

/// Run a request against a set of records.
pub fn execute<T: Entity>(records: Vec<T>, request: &FetchRequest) -> Result<Vec<T>> {
    let total = records.len();
    let predicate = request.predicate().map(Where::compile).transpose()?;

    let mut matched = Vec::new();
    for record in records {
        let keep = match &predicate {
            Some(expr) => engine::eval(expr, &record)?,
            None => true,
        };
        if keep {
            matched.push(record);
        }
    }

    if !request.sort_keys().is_empty() {
        matched.sort_by(|a, b| {
            for key in request.sort_keys() {
                let ord = sort_order(
                    &a.value_for(&key.key_path).unwrap_or(Value::Null),
                    &b.value_for(&key.key_path).unwrap_or(Value::Null),
                );
                let ord = if key.ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    let limit = request.fetch_limit.unwrap_or(usize::MAX);
    let page: Vec<T> = matched
        .into_iter()
        .skip(request.fetch_offset)
        .take(limit)
        .collect();

    tracing::debug!(
        entity = request.entity(),
        kind = %request.kind(),
        predicate = %request.predicate().map(ToString::to_string).unwrap_or_default(),
        scanned = total,
        returned = page.len(),
        "Executed request"
    );
    Ok(page)
}

/// Total order used for sorting. Unlike predicate ordering this never fails:
/// values of unrelated types fall back to ordering by type.
fn sort_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let x = a.as_f64().unwrap_or_default();
            let y = b.as_f64().unwrap_or_default();
            x.total_cmp(&y)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::Uuid(x), Value::Uuid(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::Text(_) => 3,
        Value::Timestamp(_) => 4,
        Value::Uuid(_) => 5,
    }
}
