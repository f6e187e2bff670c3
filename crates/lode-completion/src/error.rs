//! Error types for the completion crate.

use lode_core::LoadableError;
use lode_types::Status;

/// Contract violations raised by the completion protocol.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum CompletionError {
    /// A completion can only track a loadable that is actually loading.
    #[error("cannot track a loadable that is not loading: {0}")]
    NotLoading(Status),

    /// Fulfilment requires a terminal loadable that is ready.
    #[error("cannot fulfil with a loadable that is not ready: {0}")]
    NotReady(Status),

    /// Rejection requires a terminal loadable that records an error.
    #[error("cannot reject with a loadable that records no error: {0}")]
    NotFailed(Status),

    /// Spawning the operation needs a tokio runtime.
    #[error("no tokio runtime available to drive the operation")]
    NoRuntime,

    /// A transition failed while settling.
    #[error("loadable error: {0}")]
    Loadable(#[from] LoadableError),
}

/// Convenience alias for completion results.
pub type CompletionResult<T> = Result<T, CompletionError>;
