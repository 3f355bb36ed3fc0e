//! # CLI Layer
//!
//! One possible client of the library, and the only place that knows about
//! the terminal: argument parsing (`setup`), dispatch to the API
//! (`commands`), output formatting (`render`) and logger installation.

mod commands;
mod render;
mod setup;

pub use commands::run;
