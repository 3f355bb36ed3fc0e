//! # Wherekit Architecture
//!
//! Wherekit is a **fluent filter-clause library** for fetch, query and delete
//! requests, plus a small palette catalog that exercises it from the
//! command line.
//!
//! ```
//! use wherekit::{FetchRequest, OrderBy, RequestKind, Value, Where};
//!
//! let request = FetchRequest::new("Palette", RequestKind::Fetch)
//!     .with(&(Where::format("hue >= %d", vec![Value::Int(180)]) & !Where::eq("color_name", "Teal")))
//!     .with(&OrderBy::ascending("hue"));
//!
//! assert_eq!(
//!     request.predicate().unwrap().to_string(),
//!     r#"(hue >= 180) AND (NOT (color_name == "Teal"))"#
//! );
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, installs the logger    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) + Command Layer (commands/*.rs)         │
//! │  - Demo operations on palettes, returning CmdResult         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait, FileStore, InMemoryStore                │
//! │  - Executes requests by evaluating compiled predicates      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clauses (clauses/) and Requests (request.rs)               │
//! │  - Where, OrderBy, Tweak applied to a FetchRequest          │
//! │  Engine (engine/)                                           │
//! │  - Predicate syntax, typed placeholders, evaluation         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clause construction is pure: nothing is parsed or validated until a
//! store (or [`Where::compile`]) hands the clause to the engine.
//!
//! ## Logging
//!
//! The library reports through `tracing` and never installs a subscriber.
//! Overwriting a request's predicate or sort keys emits one warning; store
//! execution logs at debug.
//!
//! ## Module Overview
//!
//! - [`clauses`]: `Where`, `OrderBy`, `Tweak` and the `Clause` trait
//! - [`request`]: `FetchRequest` and its kinds
//! - [`engine`]: predicate parsing and evaluation
//! - [`value`], [`key_path`], [`record`]: what predicates are made of and run against
//! - [`store`]: storage abstraction and implementations
//! - [`model`]: the demo `Palette` entity
//! - [`api`], [`commands`], [`config`]: the demo application core
//! - [`error`]: error types

pub mod api;
pub mod clauses;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod key_path;
pub mod model;
pub mod record;
pub mod request;
pub mod store;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod value;

pub use clauses::{and, not, or, ApplyOutcome, Clause, OrderBy, SortKey, Tweak, Where};
pub use error::{Result, WherekitError};
pub use key_path::KeyPath;
pub use record::{Entity, FieldMap, Record};
pub use request::{FetchRequest, RequestKind};
pub use value::Value;
