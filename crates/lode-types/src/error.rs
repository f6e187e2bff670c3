use thiserror::Error;

/// Errors produced when a value does not have the shape of a lode type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected {expected}, got {actual}")]
    NotAnObject {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unexpected field `{0}`")]
    UnexpectedField(String),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Convenience alias for type validation results.
pub type TypeResult<T> = Result<T, TypeError>;
