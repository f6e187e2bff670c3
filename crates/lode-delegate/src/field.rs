//! Reflective, name-addressed field access.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DelegateError, DelegateResult};

/// The kind of reflective mutation being attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// Overwrite or insert a field.
    Assign,
    /// Remove a field.
    Delete,
    /// Insert a field only if it does not exist yet.
    Define,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assign => "assign",
            Self::Delete => "delete",
            Self::Define => "define",
        })
    }
}

/// A value whose fields can be looked up, listed and edited by name.
///
/// This is the reflective surface tooling uses when it does not know the
/// concrete type it is holding (for example a renderer walking a JSON item).
/// Reads never fail; a missing field is `None`. Writes may fail, either
/// because the value has no fields at all or because it is immutable.
pub trait FieldAccess {
    /// Look up a field by name.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// The enumerable field names, in the value's natural order.
    fn field_names(&self) -> Vec<String>;

    /// Returns `true` if `name` resolves to a field.
    fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Overwrite or insert a field.
    fn set_field(&mut self, name: &str, value: Value) -> DelegateResult<()>;

    /// Remove a field, returning its previous value.
    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>>;

    /// Insert a field if absent. Returns `true` if the field was inserted.
    fn define_field(&mut self, name: &str, value: Value) -> DelegateResult<bool>;
}

impl FieldAccess for Map<String, Value> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn set_field(&mut self, name: &str, value: Value) -> DelegateResult<()> {
        self.insert(name.to_string(), value);
        Ok(())
    }

    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>> {
        Ok(self.remove(name))
    }

    fn define_field(&mut self, name: &str, value: Value) -> DelegateResult<bool> {
        if self.contains_key(name) {
            return Ok(false);
        }
        self.insert(name.to_string(), value);
        Ok(true)
    }
}

impl FieldAccess for Value {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get_field(name))
    }

    fn field_names(&self) -> Vec<String> {
        self.as_object()
            .map(FieldAccess::field_names)
            .unwrap_or_default()
    }

    fn set_field(&mut self, name: &str, value: Value) -> DelegateResult<()> {
        object_mut(self, Mutation::Assign, name)?.set_field(name, value)
    }

    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>> {
        object_mut(self, Mutation::Delete, name)?.remove_field(name)
    }

    fn define_field(&mut self, name: &str, value: Value) -> DelegateResult<bool> {
        object_mut(self, Mutation::Define, name)?.define_field(name, value)
    }
}

/// An absent value has no fields.
impl<T: FieldAccess> FieldAccess for Option<T> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.as_ref().and_then(|value| value.get_field(name))
    }

    fn field_names(&self) -> Vec<String> {
        self.as_ref()
            .map(FieldAccess::field_names)
            .unwrap_or_default()
    }

    fn set_field(&mut self, name: &str, value: Value) -> DelegateResult<()> {
        match self {
            Some(inner) => inner.set_field(name, value),
            None => Err(not_an_object(Mutation::Assign, name)),
        }
    }

    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>> {
        match self {
            Some(inner) => inner.remove_field(name),
            None => Err(not_an_object(Mutation::Delete, name)),
        }
    }

    fn define_field(&mut self, name: &str, value: Value) -> DelegateResult<bool> {
        match self {
            Some(inner) => inner.define_field(name, value),
            None => Err(not_an_object(Mutation::Define, name)),
        }
    }
}

/// The empty extension: no fields, nothing to mutate.
impl FieldAccess for () {
    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn set_field(&mut self, name: &str, _value: Value) -> DelegateResult<()> {
        Err(not_an_object(Mutation::Assign, name))
    }

    fn remove_field(&mut self, name: &str) -> DelegateResult<Option<Value>> {
        Err(not_an_object(Mutation::Delete, name))
    }

    fn define_field(&mut self, name: &str, _value: Value) -> DelegateResult<bool> {
        Err(not_an_object(Mutation::Define, name))
    }
}

fn object_mut<'a>(
    value: &'a mut Value,
    op: Mutation,
    field: &str,
) -> DelegateResult<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| not_an_object(op, field))
}

fn not_an_object(op: Mutation, field: &str) -> DelegateError {
    DelegateError::NotAnObject {
        op,
        field: field.to_string(),
    }
}
