//! Structural validation of status and loadable snapshots.
//!
//! A loadable serializes as `{"item": ..., "status": {...}}`, with no `item`
//! key when the item is absent. These checks decide whether an arbitrary JSON
//! value has that shape without attempting to interpret the item.

use serde_json::{Map, Value};

use crate::error::{TypeError, TypeResult};
use crate::failure::Failure;
use crate::status::Status;

/// Snapshot key holding the item.
pub const ITEM_KEY: &str = "item";
/// Snapshot key holding the status.
pub const STATUS_KEY: &str = "status";

const STATUS_FIELDS: [&str; 3] = ["ready", "loading", "error"];

/// Returns `true` iff `value` is an object with exactly the fields `ready`
/// (bool), `loading` (bool) and `error` (null or an error object).
pub fn is_status(value: &Value) -> bool {
    Status::try_from(value).is_ok()
}

/// Returns `true` iff `value` is an object with a `status` key that passes
/// [`is_status`]. The `item` key is unconstrained: any value, `null`
/// included, or missing for an absent item.
pub fn is_loadable(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    map.get(STATUS_KEY).is_some_and(is_status)
}

impl TryFrom<&Value> for Status {
    type Error = TypeError;

    fn try_from(value: &Value) -> TypeResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(TypeError::NotAnObject {
                    expected: "status object",
                    actual: kind_of(other),
                })
            }
        };
        if let Some(extra) = map.keys().find(|k| !STATUS_FIELDS.contains(&k.as_str())) {
            return Err(TypeError::UnexpectedField(extra.clone()));
        }

        let ready = bool_field(map, "ready")?;
        let loading = bool_field(map, "loading")?;
        let error = match map.get("error") {
            None => return Err(TypeError::MissingField("error")),
            Some(Value::Null) => None,
            Some(value) => Some(failure_field(value)?),
        };
        Ok(Status::new(ready, loading, error))
    }
}

fn bool_field(map: &Map<String, Value>, field: &'static str) -> TypeResult<bool> {
    match map.get(field) {
        None => Err(TypeError::MissingField(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(TypeError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

fn failure_field(value: &Value) -> TypeResult<Failure> {
    let wrong = TypeError::WrongType {
        field: "error",
        expected: "null or an object with a string `message`",
    };
    match value {
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => Ok(Failure::msg(message.clone())),
            _ => Err(wrong),
        },
        _ => Err(wrong),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
