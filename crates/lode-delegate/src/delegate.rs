use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::delegable::Delegable;
use crate::error::{DelegateError, DelegateResult};
use crate::field::{FieldAccess, Mutation};

/// A host value carrying a hidden extension, presented as the host.
///
/// `Delegate` behaves like `V` to every observer:
///
/// - it dereferences to `&V`, so all of `V`'s methods apply to the real value;
/// - `Display`, `Debug`, `Hash`, `PartialEq<V>` and `PartialOrd<V>` forward to `V`;
/// - it serializes as `V` alone, so copies made through serde drop the extension;
/// - [`FieldAccess`] lookups consult the extension first and the host second,
///   but only the host's fields are ever listed.
///
/// It never implements `DerefMut`, and all reflective mutations are
/// rejected, so a delegate is immutable once built. The extension is
/// reachable through the associated functions [`Delegate::parts`],
/// [`Delegate::extension`] and [`Delegate::inspect`]; they are not methods so
/// that they cannot shadow methods of `V`.
#[derive(Clone)]
pub struct Delegate<V, X = ()> {
    value: V,
    extension: X,
}

impl<V, X> Delegate<V, X> {
    /// Wrap `value`, attaching `extension`.
    ///
    /// Fails if `value` reports itself as not delegable.
    pub fn wrap(value: V, extension: X) -> DelegateResult<Self>
    where
        V: Delegable,
    {
        value.check_delegable()?;
        Ok(Self { value, extension })
    }

    /// Borrow the host and the extension without any field resolution.
    pub fn parts(this: &Self) -> (&V, &X) {
        (&this.value, &this.extension)
    }

    /// Borrow the extension.
    pub fn extension(this: &Self) -> &X {
        &this.extension
    }

    /// Take the delegate apart.
    pub fn into_parts(this: Self) -> (V, X) {
        (this.value, this.extension)
    }

    /// Render `{value, extension}` for debugging tools.
    pub fn inspect(this: &Self) -> serde_json::Result<Value>
    where
        V: Serialize,
        X: Serialize,
    {
        Ok(serde_json::json!({
            "value": serde_json::to_value(&this.value)?,
            "extension": serde_json::to_value(&this.extension)?,
        }))
    }
}

impl<V, X> Delegate<Option<V>, X> {
    /// A delegate over an absent host. Always succeeds.
    pub fn absent(extension: X) -> Self {
        Self {
            value: None,
            extension,
        }
    }
}

impl<V, X> Deref for Delegate<V, X> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

impl<V, X> AsRef<V> for Delegate<V, X> {
    fn as_ref(&self) -> &V {
        &self.value
    }
}

impl<V: fmt::Display, X> fmt::Display for Delegate<V, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

/// Debug output shows only the host, the way inspectors print the bare value.
impl<V: fmt::Debug, X> fmt::Debug for Delegate<V, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl<V: PartialEq, X> PartialEq<V> for Delegate<V, X> {
    fn eq(&self, other: &V) -> bool {
        self.value == *other
    }
}

impl<V: PartialOrd, X> PartialOrd<V> for Delegate<V, X> {
    fn partial_cmp(&self, other: &V) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(other)
    }
}

impl<V: Hash, X> Hash for Delegate<V, X> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<V: Serialize, X> Serialize for Delegate<V, X> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<V: FieldAccess, X: FieldAccess> FieldAccess for Delegate<V, X> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.extension
            .get_field(name)
            .or_else(|| self.value.get_field(name))
    }

    fn field_names(&self) -> Vec<String> {
        self.value.field_names()
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};
    use serde_json::{json, Map};

    fn ext(fields: Value) -> Map<String, Value> {
        fields.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn string_host_formats_as_string() {
        let d = Delegate::wrap(String::from("foo"), ()).unwrap();
        assert_eq!(d.to_string(), "foo");
        assert_eq!(format!("{d}"), "foo");
        assert_eq!(format!("{d:?}"), "\"foo\"");
        assert_eq!(d.len(), 3);
        assert!(d == String::from("foo"));
    }

    #[test]
    fn number_host_compares_as_number() {
        let d = Delegate::wrap(42_i64, ()).unwrap();
        assert_eq!(*d, 42);
        assert!(d == 42);
        assert!(d > 41);
        assert_eq!(*d + 1, 43);
        assert_eq!(d.to_string(), "42");
    }

    #[test]
    fn date_host_answers_accessors() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        let d = Delegate::wrap(date, ()).unwrap();
        assert_eq!(d.year(), date.year());
        assert_eq!(d.month(), date.month());
        assert_eq!(d.day(), date.day());
        assert_eq!(d.hour(), date.hour());
        assert_eq!(d.weekday(), date.weekday());
        assert_eq!(*d - date, chrono::Duration::zero());
    }

    #[test]
    fn json_boolean_is_rejected() {
        let err = Delegate::wrap(json!(false), ()).unwrap_err();
        assert_eq!(err, DelegateError::NotDelegable("boolean"));
    }

    #[test]
    fn extension_shadows_host_fields() {
        let host = json!({ "name": "host", "size": 3 });
        let d = Delegate::wrap(host, ext(json!({ "name": "extension" }))).unwrap();
        assert_eq!(d.get_field("name"), Some(json!("extension")));
        assert_eq!(d.get_field("size"), Some(json!(3)));
        assert!(d.has_field("size"));
        assert!(d.get_field("missing").is_none());
    }

    #[test]
    fn extension_fields_are_not_enumerated() {
        let host = json!({ "a": 1, "b": 2 });
        let d = Delegate::wrap(host.clone(), ext(json!({ "hidden": true }))).unwrap();
        assert_eq!(d.field_names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_value(&d).unwrap(), host);
    }

    #[test]
    fn mutations_are_rejected() {
        let mut d = Delegate::wrap(json!({ "a": 1 }), ()).unwrap();
        assert_eq!(
            d.set_field("a", json!(2)),
            Err(DelegateError::immutable(Mutation::Assign, "a"))
        );
        assert_eq!(
            d.remove_field("a"),
            Err(DelegateError::immutable(Mutation::Delete, "a"))
        );
        assert_eq!(
            d.define_field("b", json!(3)),
            Err(DelegateError::immutable(Mutation::Define, "b"))
        );
        assert_eq!(*d, json!({ "a": 1 }));
    }

    #[test]
    fn parts_bypass_field_resolution() {
        let d = Delegate::wrap(json!({ "k": "host" }), ext(json!({ "k": "ext" }))).unwrap();
        let (value, extension) = Delegate::parts(&d);
        assert_eq!(value["k"], json!("host"));
        assert_eq!(extension["k"], json!("ext"));
        assert_eq!(Delegate::extension(&d)["k"], json!("ext"));

        let inspected = Delegate::inspect(&d).unwrap();
        assert_eq!(
            inspected,
            json!({ "value": { "k": "host" }, "extension": { "k": "ext" } })
        );

        let (value, _) = Delegate::into_parts(d);
        assert_eq!(value, json!({ "k": "host" }));
    }

    #[test]
    fn absent_host_derefs_to_none() {
        let d: Delegate<Option<Value>, Map<String, Value>> =
            Delegate::absent(ext(json!({ "tag": 1 })));
        assert!(d.is_none());
        assert!(d.field_names().is_empty());
        assert_eq!(d.get_field("tag"), Some(json!(1)));
        assert_eq!(Delegate::extension(&d)["tag"], json!(1));
    }

    #[test]
    fn hash_matches_host() {
        use std::collections::hash_map::DefaultHasher;

        let hash = |v: &dyn Fn(&mut DefaultHasher)| {
            let mut h = DefaultHasher::new();
            v(&mut h);
            h.finish()
        };
        let d = Delegate::wrap(String::from("key"), 7_u8).unwrap();
        assert_eq!(
            hash(&|h| d.hash(h)),
            hash(&|h| String::from("key").hash(h))
        );
    }
}
