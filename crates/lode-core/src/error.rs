//! Error types for the core crate.

use lode_delegate::DelegateError;
use lode_types::TypeError;

/// Contract violations raised by loadable construction and transitions.
///
/// Fetch failures are never reported through this type; they are recorded
/// in [`Status::error`](lode_types::Status) instead.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum LoadableError {
    /// `mark_ready` was called with no item to become ready with.
    #[error("cannot mark a loadable ready without an item")]
    MissingItem,

    /// A `LoadError` was built from a loadable that records no error.
    #[error("loadable carries no error: status is {0}")]
    NoError(lode_types::Status),

    /// The item cannot be wrapped by a proxy.
    #[error("proxy rejected item: {0}")]
    Delegate(#[from] DelegateError),

    /// A snapshot does not have the loadable shape.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] TypeError),

    /// The snapshot's item could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LoadableError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience alias for loadable results.
pub type LoadableResult<T> = Result<T, LoadableError>;
