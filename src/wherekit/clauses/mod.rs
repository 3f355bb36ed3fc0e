//! # Clauses
//!
//! Clauses are immutable values applied to a [`FetchRequest`]:
//!
//! - [`Where`]: the filter predicate, built from literals, format strings,
//!   equality and membership tests, and combined with [`and`], [`or`] and
//!   [`not`] (or the `&`, `|` and `!` operators).
//! - [`OrderBy`]: sort keys.
//! - [`Tweak`]: arbitrary request adjustments such as limits.
//!
//! ## Overwrites
//!
//! A request holds a single predicate and a single ordering. Applying a clause
//! over a different existing one replaces it unconditionally. The replacement
//! is reported twice, independently: as the returned
//! [`ApplyOutcome`], so callers can surface it, and as one `tracing` warning.
//! Applying to an empty request, or re-applying an identical clause, reports
//! nothing.

mod order_by;
mod tweak;
mod where_clause;

#[cfg(test)]
mod tests;

pub use order_by::{OrderBy, SortKey};
pub use tweak::Tweak;
pub use where_clause::{LogicalOp, Predicate, Where};

use crate::request::FetchRequest;

/// Something that can be applied to a request.
pub trait Clause {
    fn apply_to(&self, request: &mut FetchRequest) -> ApplyOutcome;
}

/// What applying a clause did to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ApplyOutcome {
    /// The clause was applied without discarding anything.
    Applied,
    /// A different predicate was already present and has been replaced.
    ReplacedPredicate { previous: Where },
    /// Different sort keys were already present and have been replaced.
    ReplacedSortKeys { previous: Vec<SortKey> },
}

impl ApplyOutcome {
    pub fn is_replaced(&self) -> bool {
        !matches!(self, ApplyOutcome::Applied)
    }

    /// Human-readable note about the overwrite, if any.
    pub fn describe(&self) -> Option<String> {
        match self {
            ApplyOutcome::Applied => None,
            ApplyOutcome::ReplacedPredicate { previous } => Some(format!(
                "An existing predicate was replaced by the new Where clause (was: {})",
                previous
            )),
            ApplyOutcome::ReplacedSortKeys { previous } => {
                let keys: Vec<String> = previous.iter().map(ToString::to_string).collect();
                Some(format!(
                    "Existing sort keys were replaced by the new OrderBy clause (was: {})",
                    keys.join(", ")
                ))
            }
        }
    }
}

/// Conjunction of two clauses.
pub fn and(left: Where, right: Where) -> Where {
    left.and(right)
}

/// Disjunction of two clauses.
pub fn or(left: Where, right: Where) -> Where {
    left.or(right)
}

/// Negation of a clause.
pub fn not(clause: Where) -> Where {
    !clause
}
