//! Transparent delegation substrate for lode.
//!
//! A [`Delegate`] pairs a host value with an extension object and presents
//! itself as the host: it dereferences to it, formats as it, compares equal
//! to it and serializes as it. The extension is only reachable through the
//! associated functions on [`Delegate`] and, for reflective callers, through
//! [`FieldAccess`] lookups where it shadows the host's own fields.
//!
//! Delegates are immutable. They never hand out `&mut` access to the host,
//! and every reflective mutation fails with [`DelegateError::Immutable`].
//!
//! # Key Types
//!
//! - [`Delegate`] -- The wrapper itself
//! - [`Delegable`] -- Values that can be faithfully wrapped
//! - [`FieldAccess`] -- Reflective, name-addressed field view

pub mod delegable;
pub mod delegate;
pub mod error;
pub mod field;

pub use delegable::Delegable;
pub use delegate::Delegate;
pub use error::{DelegateError, DelegateResult};
pub use field::{FieldAccess, Mutation};
