use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{DelegateError, DelegateResult};

/// A value that a [`Delegate`](crate::Delegate) can present as itself.
///
/// Strings and numbers qualify: the wrapper formats, compares and
/// dereferences exactly like the primitive. `bool` has no impl. Dynamic values
/// (such as [`serde_json::Value`]) override [`Delegable::check_delegable`] to
/// reject their boolean variant at runtime.
pub trait Delegable {
    /// Returns an error if this particular value cannot be wrapped.
    fn check_delegable(&self) -> DelegateResult<()> {
        Ok(())
    }
}

macro_rules! delegable {
    ($($ty:ty),* $(,)?) => {
        $(impl Delegable for $ty {})*
    };
}

delegable!(
    String, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

delegable!(
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
    chrono::Duration,
);

impl Delegable for &str {}

impl<Tz: chrono::TimeZone> Delegable for chrono::DateTime<Tz> {}

impl<T> Delegable for Vec<T> {}

impl<K, V, S> Delegable for HashMap<K, V, S> {}

impl<K, V> Delegable for BTreeMap<K, V> {}

impl Delegable for Map<String, Value> {}

impl Delegable for Value {
    fn check_delegable(&self) -> DelegateResult<()> {
        match self {
            Value::Bool(_) => Err(DelegateError::NotDelegable("boolean")),
            _ => Ok(()),
        }
    }
}

/// An absent host is always delegable; a present one defers to its own check.
impl<T: Delegable> Delegable for Option<T> {
    fn check_delegable(&self) -> DelegateResult<()> {
        match self {
            Some(value) => value.check_delegable(),
            None => Ok(()),
        }
    }
}

impl<T: Delegable + ?Sized> Delegable for Box<T> {
    fn check_delegable(&self) -> DelegateResult<()> {
        (**self).check_delegable()
    }
}

impl<T: Delegable + ?Sized> Delegable for Arc<T> {
    fn check_delegable(&self) -> DelegateResult<()> {
        (**self).check_delegable()
    }
}

impl<T: Delegable + ?Sized> Delegable for Rc<T> {
    fn check_delegable(&self) -> DelegateResult<()> {
        (**self).check_delegable()
    }
}
