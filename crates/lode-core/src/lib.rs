//! Loadable values for lode.
//!
//! A *loadable* is an item that may or may not exist yet, paired with the
//! [`Status`] of the fetch that produces it. Any type implementing
//! [`Loadable`] can be driven through the lifecycle transitions in
//! [`transition`]; two representations are provided:
//!
//! - [`LoadableRecord`] -- A plain aggregate with `item()` / `status()` accessors
//! - [`LoadableProxy`] -- A transparent wrapper that dereferences to the item
//!
//! Transitions never mutate their input. Each one rebuilds a fresh value of
//! the same representation through [`Loadable::rebuild`].
//!
//! # Key Types
//!
//! - [`Loadable`] -- The item/status/rebuild capability
//! - [`LoadError`] -- A failed loadable travelling through an error channel
//! - [`LoadableError`] -- Contract violations

pub mod error;
pub mod loadable;
pub mod proxy;
pub mod record;
pub mod transition;

pub use error::{LoadableError, LoadableResult};
pub use loadable::{snapshot, LoadError, Loadable};
pub use proxy::LoadableProxy;
pub use record::LoadableRecord;
pub use transition::{mark_failed, mark_loading, mark_ready, update, Transition};

// Re-export the status model so callers need a single dependency.
pub use lode_types::{is_loadable, is_status, Failure, Phase, Status, StatusPatch};
