//! Foundation types for lode.
//!
//! This crate provides the lifecycle status model shared by every other lode
//! crate: the three-flag [`Status`], the identity-compared [`Failure`] it
//! records, partial overrides via [`StatusPatch`], and structural validators
//! for JSON snapshots of statuses and loadables.
//!
//! # Key Types
//!
//! - [`Status`] -- `{ready, loading, error}` lifecycle triple
//! - [`StatusPatch`] -- Flat partial override merged onto a status
//! - [`Phase`] -- Human-oriented classification of a status
//! - [`Failure`] -- Shared, clonable error value compared by identity
//! - [`is_status`] / [`is_loadable`] -- Structural checks over snapshots

pub mod error;
pub mod failure;
pub mod status;
pub mod validate;

pub use error::{TypeError, TypeResult};
pub use failure::Failure;
pub use status::{Phase, Status, StatusPatch};
pub use validate::{is_loadable, is_status, ITEM_KEY, STATUS_KEY};
