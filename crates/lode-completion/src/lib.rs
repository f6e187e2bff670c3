//! Completion protocol for lode.
//!
//! A [`Completion`] binds one in-flight fetch to exactly one terminal
//! loadable. It is created from a loadable whose status is `loading`, and
//! settles once, either fulfilled with a `ready` loadable or rejected with a
//! [`LoadError`](lode_core::LoadError) carrying a failed one. The paired
//! [`Resolver`] is the only way to settle it and is consumed in doing so.
//!
//! Observers registered with [`Completion::subscribe`] see the loading item
//! immediately and the terminal item once, without branching on success or
//! failure. A `Completion` also implements
//! [`IntoFuture`](std::future::IntoFuture), so it composes with ordinary
//! `.await` chains.
//!
//! # Key Types
//!
//! - [`Completion`] -- Observable, awaitable handle to the outcome
//! - [`Resolver`] -- One-shot settling handle
//! - [`CompletionState`] -- `Loading` / `Fulfilled` / `Rejected`
//! - [`CompletionConfig`] -- Abandonment message and transition tracing
//! - [`fetch`] -- Mark loading, run an operation, settle from its result

pub mod completion;
pub mod config;
pub mod error;
pub mod fetch;
pub mod state;

pub use completion::{Completion, Outcome, Resolver};
pub use config::CompletionConfig;
pub use error::{CompletionError, CompletionResult};
pub use fetch::{fetch, fetch_with_config};
pub use state::CompletionState;
