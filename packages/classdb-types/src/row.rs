//! Dynamic rows.
//!
//! Rows arrive from the remote store as JSON objects and keep that open
//! shape in the cache. Known tables additionally have typed records (see
//! [`crate::model`]); the dynamic form is what the loader, filter engine,
//! and relation resolver operate on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a table, as returned by the remote query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

impl Row {
    /// Empty row.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value; returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The row as a JSON value (for deserializing into a typed record).
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    /// The value of the conventional `id` column.
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Coerces a value to its display string.
///
/// Nulls coerce to the empty string (the presentation adapter substitutes
/// its own missing-value marker), integral floats drop the trailing `.0`,
/// and arrays join their elements with a comma.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    return format!("{}", f as i64);
                }
            }
            n.to_string()
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Reads a value as a number, accepting numeric strings.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// The canonical loose equality used by filters and the relation resolver.
///
/// Values compare numerically when both sides parse as numbers (so `1` and
/// `"1"` are equivalent) and by display string otherwise.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x == y;
    }
    display_string(a) == display_string(b)
}
