//! # Predicate Engine
//!
//! The engine is what a `Where` clause is ultimately handed to. It owns the
//! textual predicate syntax, the typed substitution of format arguments, and
//! evaluation against records. Clause construction never touches it: a
//! malformed format string is only discovered here, when the clause is
//! compiled for execution.
//!
//! ## Syntax
//!
//! ```text
//! predicate  := or
//! or         := and (("OR" | "||") and)*
//! and        := not (("AND" | "&&") not)*
//! not        := ("NOT" | "!") not | primary
//! primary    := "(" predicate ")" | TRUEPREDICATE | FALSEPREDICATE
//!             | operand op ["[c]"] operand
//! op         := == = != <> < <= =< > >= => IN CONTAINS BEGINSWITH ENDSWITH LIKE BETWEEN
//! operand    := key.path | number | 'text' | "text" | TRUE | FALSE | YES | NO
//!             | NIL | NULL | placeholder | "{" operand ("," operand)* "}"
//! ```
//!
//! Keywords are case-insensitive.
//!
//! ## Placeholders
//!
//! Arguments are consumed left to right, one per placeholder:
//!
//! | Placeholder | Accepts | Becomes |
//! |-------------|---------|---------|
//! | `%@` | any value | literal |
//! | `%K` | text | key path |
//! | `%d` `%i` `%ld` `%lld` | int | literal |
//! | `%f` `%lf` `%g` | int or float | literal |
//!
//! Placeholders inside quoted strings are plain text. Supplying more or fewer
//! arguments than placeholders is an error.
//!
//! ## Evaluation
//!
//! - A missing field and `nil` are the same thing.
//! - `==` never fails: values of unrelated types are unequal. Integers and
//!   floats compare numerically.
//! - Ordering (`<`, `BETWEEN`, ...) against nil is false; between unrelated
//!   types it is an [`EvalError`].
//! - `[c]` makes text comparisons case-insensitive.

mod error;
mod eval;
mod expr;
mod lexer;
mod parser;

pub use error::{EvalError, FormatError};
pub use eval::eval;
pub(crate) use expr::fmt_key_path;
pub use expr::{CompareOp, Comparison, Expr, Operand};
pub use parser::{parse, MAX_DEPTH};
