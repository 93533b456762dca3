//! Value - the JSON-like data type stored in tables.
//!
//! A `Value` represents any record (or part of a record) that can be kept in a
//! table. Tables are persisted as JSON text, so `Value` covers exactly what
//! JSON can express.
//!
//! # Supported Types
//!
//! - **Null**: Absence of a value
//! - **Bool**: true or false
//! - **Number**: f64 floating point numbers
//! - **String**: UTF-8 encoded text
//! - **Array**: Ordered list of values
//! - **Object**: Field-to-value map
//!
//! Objects use a `BTreeMap`, so two records with the same fields compare equal
//! and encode to the same text regardless of the order fields were added in.
//!
//! # Example
//!
//! ```rust
//! use kvtables::{record, Value};
//!
//! let user = record! { "id" => "1", "name" => "Ann", "age" => 31 };
//! assert_eq!(user.id(), Some(&Value::from("1")));
//! assert_eq!(user.get("age").and_then(Value::as_f64), Some(31.0));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field conventionally used as a record's identity.
pub const ID_FIELD: &str = "id";

/// Deepest container nesting a record may have. Stored tables add one more
/// level, and the whole must stay under serde_json's parse limit of 128.
pub const MAX_DEPTH: usize = 100;

/// 2^63 and 2^64, the first whole f64 values outside `i64` and `u64`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;
const U64_END: f64 = 18_446_744_073_709_551_616.0;

/// A value held in a table.
///
/// Serializes untagged, so the JSON form is plain JSON with no enum markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// A single item in a table. Any value is accepted; objects with an `id`
/// field take part in id lookups.
pub type Record = Value;

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a field of an object value. Non-objects have no fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(field))
    }

    /// The record's `id` field, if it is an object that carries one.
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD)
    }

    /// True when the value's `id` field is present and strictly equal to `id`.
    ///
    /// Strict means no coercion: `"1"` and `1` are different ids.
    pub fn has_id(&self, id: &Value) -> bool {
        self.id() == Some(id)
    }

    /// Returns the first non-finite number found anywhere in the value.
    ///
    /// JSON has no encoding for NaN or the infinities.
    pub(crate) fn find_non_finite(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_finite() => Some(*n),
            Value::Array(arr) => arr.iter().find_map(Value::find_non_finite),
            Value::Object(obj) => obj.values().find_map(Value::find_non_finite),
            _ => None,
        }
    }

    /// Container nesting depth: 0 for scalars, 1 for a flat array or object.
    ///
    /// Stops descending once `limit` is exceeded, so the result is at most
    /// `limit + 1`.
    pub(crate) fn depth(&self, limit: usize) -> usize {
        match self {
            Value::Array(_) | Value::Object(_) if limit == 0 => 1,
            Value::Array(arr) => 1 + arr.iter().map(|v| v.depth(limit - 1)).max().unwrap_or(0),
            Value::Object(obj) => 1 + obj.values().map(|v| v.depth(limit - 1)).max().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Builds an object [`Value`] from `field => value` pairs.
///
/// ```rust
/// use kvtables::record;
///
/// let r = record! { "id" => "2", "name" => "Bo", "admin" => false };
/// assert_eq!(r.get("name").and_then(|v| v.as_str()), Some("Bo"));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Value::Object(::std::collections::BTreeMap::new())
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut fields = ::std::collections::BTreeMap::new();
        $(
            fields.insert(::std::string::String::from($field), $crate::Value::from($value));
        )+
        $crate::Value::Object(fields)
    }};
}

// Conversions
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

/// Integers beyond ±2^53 are rounded to the nearest f64.
impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(obj: BTreeMap<String, Value>) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            // Whole numbers become JSON integers so they deserialize into
            // integer fields. Past 2^53 this is the already-rounded f64.
            Value::Number(n) if n.fract() == 0.0 && (-I64_END..I64_END).contains(&n) => {
                serde_json::Value::Number((n as i64).into())
            }
            Value::Number(n) if n.fract() == 0.0 && (0.0..U64_END).contains(&n) => {
                serde_json::Value::Number((n as u64).into())
            }
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}
