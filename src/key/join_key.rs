// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::KeyResolutionError;

/// The identity items are grouped by across sources.
///
/// Keys are compared, hashed and ordered by their canonical text, so `Int(1)`,
/// `Text("1")` and a float `1.0` are the same key. A group keeps the key value of
/// the first item that created it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JoinKey {
    Int(i64),
    Text(String),
    /// A `null` element or field value.
    Null,
    /// The first element of an empty array.
    Absent,
}

impl JoinKey {
    /// Convert a scalar item value into a key.
    ///
    /// Integral numbers (including floats such as `1.0`) that fit in `i64` become
    /// `Int`, strings stay text, and any other scalar is keyed by its JSON text.
    /// Objects and arrays cannot be keys.
    pub fn from_value(value: &Value) -> Result<Self, KeyResolutionError> {
        match value {
            Value::String(s) => Ok(JoinKey::Text(s.clone())),
            Value::Number(n) => Ok(match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => JoinKey::Int(i),
                (None, Some(f)) if is_integral(f) => JoinKey::Int(f as i64),
                _ => JoinKey::Text(n.to_string()),
            }),
            Value::Bool(b) => Ok(JoinKey::Text(b.to_string())),
            Value::Null => Ok(JoinKey::Null),
            Value::Array(_) | Value::Object(_) => Err(KeyResolutionError::NotScalar {
                found: kind_of(value),
            }),
        }
    }

    /// Key derived from a sequential position within a source.
    pub fn position(position: u64) -> Self {
        match i64::try_from(position) {
            Ok(p) => JoinKey::Int(p),
            Err(_) => JoinKey::Text(position.to_string()),
        }
    }

    /// Text that decides key equality.
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            JoinKey::Int(i) => Cow::Owned(i.to_string()),
            JoinKey::Text(s) => Cow::Borrowed(s),
            JoinKey::Null => Cow::Borrowed("null"),
            JoinKey::Absent => Cow::Borrowed("undefined"),
        }
    }
}

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

impl PartialEq for JoinKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for JoinKey {}

impl Hash for JoinKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Ord for JoinKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl PartialOrd for JoinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl From<i64> for JoinKey {
    fn from(value: i64) -> Self {
        JoinKey::Int(value)
    }
}

impl From<&str> for JoinKey {
    fn from(value: &str) -> Self {
        JoinKey::Text(value.to_string())
    }
}

impl From<String> for JoinKey {
    fn from(value: String) -> Self {
        JoinKey::Text(value)
    }
}

/// Whether a value counts as "no key here" for field lookups.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_of_different_types_share_a_key() {
        assert_eq!(JoinKey::from_value(&json!(7)).unwrap(), JoinKey::Int(7));
        assert_eq!(JoinKey::from_value(&json!("7")).unwrap(), JoinKey::Int(7));
        assert_eq!(JoinKey::from_value(&json!(7.0)).unwrap(), JoinKey::Text("7".into()));
        assert!(matches!(JoinKey::from_value(&json!(7.0)).unwrap(), JoinKey::Int(7)));
        assert_eq!(JoinKey::from_value(&json!(true)).unwrap(), JoinKey::from("true"));
        assert_eq!(JoinKey::Null, JoinKey::from("null"));
        assert_ne!(JoinKey::Null, JoinKey::Absent);
    }

    #[test]
    fn equal_keys_hash_alike() {
        use std::collections::HashSet;
        let keys: HashSet<JoinKey> =
            [JoinKey::Int(1), JoinKey::from("1"), JoinKey::from("01")].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn other_scalars_use_their_json_text() {
        assert_eq!(JoinKey::from_value(&json!(1.5)).unwrap(), JoinKey::Text("1.5".into()));
        assert!(matches!(JoinKey::from_value(&json!(1.5)).unwrap(), JoinKey::Text(_)));
    }

    #[test]
    fn containers_are_rejected_and_null_is_a_key() {
        assert!(matches!(
            JoinKey::from_value(&json!({"a": 1})),
            Err(KeyResolutionError::NotScalar { found: "object" })
        ));
        assert!(matches!(
            JoinKey::from_value(&json!([1])),
            Err(KeyResolutionError::NotScalar { found: "array" })
        ));
        assert!(matches!(JoinKey::from_value(&Value::Null), Ok(JoinKey::Null)));
    }

    #[test]
    fn falsy_values() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(is_falsy(&v), "{v} should be falsy");
        }
        for v in [json!(true), json!(1), json!("0"), json!([]), json!({})] {
            assert!(!is_falsy(&v), "{v} should not be falsy");
        }
    }

    #[test]
    fn display_and_serialize_are_bare() {
        assert_eq!(JoinKey::Int(2).to_string(), "2");
        assert_eq!(serde_json::to_string(&JoinKey::Text("a".into())).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&JoinKey::Int(2)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&JoinKey::Null).unwrap(), "null");
        assert_eq!(JoinKey::Absent.to_string(), "undefined");
    }
}
