use std::error::Error;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use lode_types::{Failure, Status, ITEM_KEY, STATUS_KEY};

use crate::error::{LoadableError, LoadableResult};

/// The capability shared by every loadable representation.
///
/// Implementors expose three access points and nothing else is assumed:
///
/// - [`Loadable::loadable_item`] -- the item, or `None` when absent;
/// - [`Loadable::loadable_status`] -- the lifecycle [`Status`];
/// - [`Loadable::rebuild`] -- construct a new value *of the same
///   representation* from an item and a status.
///
/// Implementations must treat `self` as immutable: `rebuild` allocates a new
/// value and leaves the receiver untouched. The access point names are long
/// on purpose, so they do not collide with methods a wrapped item might
/// expose through `Deref`.
pub trait Loadable: Sized {
    /// The type of the item being loaded.
    type Item;

    /// The current item, if one exists.
    fn loadable_item(&self) -> Option<&Self::Item>;

    /// The current lifecycle status.
    fn loadable_status(&self) -> &Status;

    /// Build a new value of the same representation.
    fn rebuild(&self, item: Option<Self::Item>, status: Status) -> LoadableResult<Self>;
}

/// Render any loadable as a `{"item": ..., "status": ...}` snapshot.
///
/// An absent item has no `item` key, so a present `null` item stays
/// distinguishable from no item at all.
pub fn snapshot<L>(loadable: &L) -> serde_json::Result<Value>
where
    L: Loadable,
    L::Item: Serialize,
{
    let mut map = serde_json::Map::new();
    if let Some(item) = loadable.loadable_item() {
        map.insert(ITEM_KEY.to_string(), serde_json::to_value(item)?);
    }
    map.insert(
        STATUS_KEY.to_string(),
        serde_json::to_value(loadable.loadable_status())?,
    );
    Ok(Value::Object(map))
}

/// A failed loadable carried through an error channel.
///
/// Pairs the terminal loadable, whose status records the failure, with a
/// message derived from that failure. Consumers that only care about status
/// can recover the loadable with [`LoadError::into_loadable`] and treat it
/// like any success.
#[derive(Clone)]
pub struct LoadError<L> {
    loadable: L,
    cause: Failure,
    message: String,
}

impl<L: Loadable> LoadError<L> {
    /// Wrap a loadable whose status records an error.
    pub fn new(loadable: L) -> LoadableResult<Self> {
        let cause = loadable
            .loadable_status()
            .error
            .clone()
            .ok_or_else(|| LoadableError::NoError(loadable.loadable_status().clone()))?;
        let message = format!("failed to load: {cause}");
        Ok(Self {
            loadable,
            cause,
            message,
        })
    }
}

impl<L> LoadError<L> {
    /// The terminal, failed loadable.
    pub fn loadable(&self) -> &L {
        &self.loadable
    }

    /// Consume the error and return the terminal loadable.
    pub fn into_loadable(self) -> L {
        self.loadable
    }

    /// The underlying failure.
    pub fn cause(&self) -> &Failure {
        &self.cause
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<L> fmt::Display for LoadError<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<L> fmt::Debug for LoadError<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadError")
            .field("message", &self.message)
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

impl<L> Error for LoadError<L> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}
