use thiserror::Error;

/// Failure to turn a format string and its arguments into an expression.
///
/// Positions are byte offsets into the format string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected character '{found}' at {pos}")]
    UnexpectedChar { pos: usize, found: char },

    #[error("unterminated string literal starting at {pos}")]
    UnterminatedString { pos: usize },

    #[error("invalid number '{text}' at {pos}")]
    InvalidNumber { pos: usize, text: String },

    #[error("unknown placeholder '%{conversion}' at {pos}")]
    UnknownPlaceholder { pos: usize, conversion: String },

    #[error("unknown comparison option '[{option}]' at {pos}")]
    UnknownOption { pos: usize, option: String },

    #[error("expected {expected} at {pos}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected}, found end of format")]
    UnexpectedEnd { expected: &'static str },

    #[error("placeholder at {pos} has no argument (only {supplied} supplied)")]
    MissingArgument { pos: usize, supplied: usize },

    #[error("format consumed {consumed} arguments but {supplied} were supplied")]
    ExtraArguments { consumed: usize, supplied: usize },

    #[error("argument {index} for '%{conversion}' must be {expected}, got {found}")]
    ArgumentType {
        index: usize,
        conversion: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("BETWEEN at {pos} needs exactly two bounds, got {count}")]
    BetweenBounds { pos: usize, count: usize },

    #[error("predicate nests more than {limit} levels deep")]
    TooDeep { limit: usize },
}

/// Failure while evaluating a compiled expression against a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },
}
