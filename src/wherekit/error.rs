use crate::engine::{EvalError, FormatError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum WherekitError {
    #[error("Invalid predicate format: {0}")]
    Format(#[from] FormatError),

    #[error("Predicate evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, WherekitError>;
