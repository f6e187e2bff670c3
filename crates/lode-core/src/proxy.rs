use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::Value;

use lode_delegate::{Delegable, Delegate, DelegateError, DelegateResult, FieldAccess, Mutation};
use lode_types::{Status, StatusPatch};

use crate::error::LoadableResult;
use crate::loadable::Loadable;

/// Hidden state a proxy attaches to its item.
///
/// It contributes no named fields, so reflective lookups on a proxy only
/// ever see the item's own fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
struct ProxyState {
    status: Status,
}

impl FieldAccess for ProxyState {
    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn set_field(&mut self, name: &str, _value: Value) -> DelegateResult<()> {
        Err(DelegateError::immutable(Mutation::Assign, name))
    }

    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>> {
        Err(DelegateError::immutable(Mutation::Delete, name))
    }

    fn define_field(&mut self, name: &str, _value: Value) -> DelegateResult<bool> {
        Err(DelegateError::immutable(Mutation::Define, name))
    }
}

/// Transparent loadable that presents as its item.
///
/// A proxy dereferences to `Option<T>` and formats, compares and serializes
/// as the item, so code that only wants the data can ignore the wrapper.
/// Strings and numbers print and compare like the primitive; dates answer
/// their accessors from the real value.
///
/// The status is reachable only through the [`Loadable`] access points.
/// Unlike [`LoadableRecord`](crate::LoadableRecord) there are no `item()` or
/// `status()` methods, which would shadow methods of the wrapped value.
///
/// Items must be [`Delegable`]; `bool` is rejected at compile time and
/// JSON booleans at construction.
#[derive(Clone)]
pub struct LoadableProxy<T> {
    inner: Delegate<Option<T>, ProxyState>,
}

impl<T: Delegable> LoadableProxy<T> {
    /// Wrap `item`. The status starts idle and `patch` is merged on top.
    pub fn new(item: Option<T>, patch: StatusPatch) -> LoadableResult<Self> {
        let state = ProxyState {
            status: Status::idle().patched(&patch),
        };
        Ok(Self {
            inner: Delegate::wrap(item, state)?,
        })
    }

    /// A proxy with no item and an idle status.
    pub fn empty() -> Self {
        Self {
            inner: Delegate::absent(ProxyState {
                status: Status::idle(),
            }),
        }
    }

    /// Take the proxy apart into its item and status.
    pub fn into_parts(this: Self) -> (Option<T>, Status) {
        let (item, state) = Delegate::into_parts(this.inner);
        (item, state.status)
    }

    /// Render `{value, extension}` for debugging tools.
    pub fn inspect(this: &Self) -> serde_json::Result<Value>
    where
        T: Serialize,
    {
        Delegate::inspect(&this.inner)
    }
}

impl<T: Delegable> Loadable for LoadableProxy<T> {
    type Item = T;

    fn loadable_item(&self) -> Option<&T> {
        (*self.inner).as_ref()
    }

    fn loadable_status(&self) -> &Status {
        &Delegate::extension(&self.inner).status
    }

    fn rebuild(&self, item: Option<T>, status: Status) -> LoadableResult<Self> {
        Ok(Self {
            inner: Delegate::wrap(item, ProxyState { status })?,
        })
    }
}

impl<T> Deref for LoadableProxy<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Option<T> {
        &self.inner
    }
}

impl<T: PartialEq> PartialEq<T> for LoadableProxy<T> {
    fn eq(&self, other: &T) -> bool {
        (*self.inner).as_ref() == Some(other)
    }
}

/// An absent item formats as the empty string.
impl<T: fmt::Display> fmt::Display for LoadableProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            Some(item) => fmt::Display::fmt(item, f),
            None => Ok(()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LoadableProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            Some(item) => fmt::Debug::fmt(item, f),
            None => f.write_str("None"),
        }
    }
}

impl<T: Serialize> Serialize for LoadableProxy<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<T: FieldAccess> FieldAccess for LoadableProxy<T> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.inner.get_field(name)
    }

    fn field_names(&self) -> Vec<String> {
        self.inner.field_names()
    }

    fn set_field(&mut self, name: &str, value: Value) -> DelegateResult<()> {
        self.inner.set_field(name, value)
    }

    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>> {
        self.inner.remove_field(name)
    }

    fn define_field(&mut self, name: &str, value: Value) -> DelegateResult<bool> {
        self.inner.define_field(name, value)
    }
}
