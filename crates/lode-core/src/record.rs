use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use lode_types::{Status, StatusPatch, TypeError, ITEM_KEY, STATUS_KEY};

use crate::error::LoadableResult;
use crate::loadable::{snapshot, Loadable};

/// Plain-aggregate loadable.
///
/// Holds an optional item and a status, readable both through the
/// [`Loadable`] access points and through the shorter [`item`](Self::item)
/// and [`status`](Self::status) accessors. There are no setters; use the
/// transitions in [`crate::transition`] to derive new records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoadableRecord<T> {
    item: Option<T>,
    status: Status,
}

impl<T> LoadableRecord<T> {
    /// Create a record. The status starts idle and `patch` is merged on top.
    pub fn new(item: Option<T>, patch: StatusPatch) -> Self {
        Self {
            item,
            status: Status::idle().patched(&patch),
        }
    }

    /// A record with no item and an idle status.
    pub fn empty() -> Self {
        Self::new(None, StatusPatch::new())
    }

    /// A record holding `item` with an idle status.
    ///
    /// Note that the status is not inferred: the record is not `ready` until
    /// a transition or patch says so.
    pub fn with_item(item: T) -> Self {
        Self::new(Some(item), StatusPatch::new())
    }

    /// The item, if present.
    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// The lifecycle status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Render this record as a `{"item", "status"}` snapshot.
    pub fn to_snapshot(&self) -> LoadableResult<Value>
    where
        T: Serialize,
    {
        Ok(snapshot(self)?)
    }

    /// Rebuild a record from a snapshot produced by [`snapshot`].
    ///
    /// A missing `item` key decodes as absent. A `null` item decodes as a
    /// present item when `T` accepts `null`, and as absent otherwise.
    pub fn from_snapshot(value: &Value) -> LoadableResult<Self>
    where
        T: DeserializeOwned,
    {
        let map = value.as_object().ok_or(TypeError::NotAnObject {
            expected: "loadable snapshot",
            actual: "non-object",
        })?;
        let status = map.get(STATUS_KEY).ok_or(TypeError::MissingField("status"))?;
        let status = Status::try_from(status)?;

        let item = match map.get(ITEM_KEY) {
            None => None,
            Some(Value::Null) => serde_json::from_value(Value::Null).ok(),
            Some(item) => Some(serde_json::from_value(item.clone())?),
        };
        Ok(Self { item, status })
    }
}

impl<T> Default for LoadableRecord<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Loadable for LoadableRecord<T> {
    type Item = T;

    fn loadable_item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    fn loadable_status(&self) -> &Status {
        &self.status
    }

    fn rebuild(&self, item: Option<T>, status: Status) -> LoadableResult<Self> {
        Ok(Self { item, status })
    }
}
