//! Error types for the delegation crate.

use crate::field::Mutation;

/// Errors that can occur when building or reflecting on a delegate.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum DelegateError {
    /// The host value cannot be wrapped without losing its identity.
    #[error("cannot delegate to a {0} value")]
    NotDelegable(&'static str),

    /// A mutation was attempted on an immutable delegate.
    #[error("cannot {op} field `{field}`: delegate is immutable")]
    Immutable { op: Mutation, field: String },

    /// The host value has no fields to mutate.
    #[error("cannot {op} field `{field}` on a non-object value")]
    NotAnObject { op: Mutation, field: String },
}

impl DelegateError {
    pub fn immutable(op: Mutation, field: impl Into<String>) -> Self {
        Self::Immutable {
            op,
            field: field.into(),
        }
    }
}

/// Convenience alias for delegation results.
pub type DelegateResult<T> = Result<T, DelegateError>;
