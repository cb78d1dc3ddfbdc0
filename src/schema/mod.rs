//! Schema-driven configuration documents
//!
//! A configuration document is an ordered key/value tree whose shape is fixed by a
//! reference "format" document. Values are classified once, at parse time, into the
//! closed set of kinds in [`SchemaValue`]; the form renderer and the shape validator
//! switch on that tag instead of inspecting JSON types at runtime.
//!
//! # Main Types
//!
//! - [`SchemaObject`] - Ordered mapping from key to [`SchemaValue`]
//! - [`SchemaValue`] - Bool, number, enum string, nested object or array of objects
//! - [`OptionCatalog`] - Option lists offered for enum-string fields
//!
//! # Example
//!
//! ```
//! use driver_studio::schema::{load, SchemaObject};
//!
//! let reference = SchemaObject::parse_str(r#"{"file":{"name":"a","desc":"b"}}"#).unwrap();
//! let candidate = SchemaObject::parse_str(r#"{"file":{"name":"d","desc":"c"}}"#).unwrap();
//! assert!(load(candidate, &reference).is_ok());
//! ```

pub mod edit;
pub mod labels;
pub mod options;
pub mod shape;

pub use edit::{coerce_number, select_bool_range};
pub use options::OptionCatalog;
pub use shape::{find_non_finite, load, load_str, signature, validate_shape};

use crate::error::{Result, StudioError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Largest integer an f64 holds exactly; integral numbers up to this are written as JSON ints
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Kind tag of a schema value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Number,
    EnumString,
    Object,
    ObjectArray,
}

impl ValueKind {
    /// Stable name used in shape signatures and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::EnumString => "string",
            ValueKind::Object => "object",
            ValueKind::ObjectArray => "array",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single value in a configuration document
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    Bool(bool),
    Number(f64),
    /// String drawn from an option list (see [`OptionCatalog`])
    EnumString(String),
    Object(SchemaObject),
    /// Homogeneous list of objects
    ObjectArray(Vec<SchemaObject>),
}

impl SchemaValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SchemaValue::Bool(_) => ValueKind::Bool,
            SchemaValue::Number(_) => ValueKind::Number,
            SchemaValue::EnumString(_) => ValueKind::EnumString,
            SchemaValue::Object(_) => ValueKind::Object,
            SchemaValue::ObjectArray(_) => ValueKind::ObjectArray,
        }
    }

    fn from_json_at(value: &Value, path: &str) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(SchemaValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(SchemaValue::Number)
                .ok_or_else(|| StudioError::InvalidNumber {
                    path: path.to_string(),
                }),
            Value::String(s) => Ok(SchemaValue::EnumString(s.clone())),
            Value::Object(map) => Ok(SchemaValue::Object(SchemaObject::from_map_at(map, path)?)),
            Value::Array(items) => {
                let mut objects = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    match item {
                        Value::Object(map) => {
                            objects.push(SchemaObject::from_map_at(map, &item_path)?)
                        }
                        other => {
                            return Err(StudioError::UnsupportedValue {
                                path: item_path,
                                reason: format!(
                                    "arrays may only contain objects, found {}",
                                    json_type_name(other)
                                ),
                            })
                        }
                    }
                }
                Ok(SchemaValue::ObjectArray(objects))
            }
            Value::Null => Err(StudioError::UnsupportedValue {
                path: path.to_string(),
                reason: "null has no editable kind".to_string(),
            }),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            SchemaValue::Bool(b) => Value::Bool(*b),
            SchemaValue::Number(n) => number_to_json(*n),
            SchemaValue::EnumString(s) => Value::String(s.clone()),
            SchemaValue::Object(obj) => obj.to_json(),
            SchemaValue::ObjectArray(items) => {
                Value::Array(items.iter().map(SchemaObject::to_json).collect())
            }
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Ordered mapping from key to value.
///
/// Keys keep their document order. The key set is fixed after construction:
/// editing goes through [`SchemaObject::fields_mut`], which hands out a slice
/// so values can change but keys cannot be added or removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaObject {
    fields: Vec<(String, SchemaValue)>,
}

impl SchemaObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used for defaults and tests. Replaces the value if the key exists.
    pub fn with_field(mut self, key: impl Into<String>, value: SchemaValue) -> Self {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Parse a JSON document. The top-level value must be an object.
    ///
    /// A number too large for `f64` is reported as an invalid number located
    /// by line and column.
    pub fn parse_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            if e.is_syntax() && e.to_string().starts_with("number out of range") {
                StudioError::InvalidNumber {
                    path: format!("line {} column {}", e.line(), e.column()),
                }
            } else {
                StudioError::from(e)
            }
        })?;
        Self::from_json(&value)
    }

    /// Classify a JSON value into a schema object
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map_at(map, ""),
            other => Err(StudioError::UnsupportedValue {
                path: String::new(),
                reason: format!("document must be an object, found {}", json_type_name(other)),
            }),
        }
    }

    fn from_map_at(map: &Map<String, Value>, path: &str) -> Result<Self> {
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            let value = SchemaValue::from_json_at(value, &child_path(path, key))?;
            fields.push((key.clone(), value));
        }
        Ok(Self { fields })
    }

    /// Convert back to JSON, preserving key order
    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }

    /// Pretty JSON text for saving. Refuses documents with non-finite numbers.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        if let Some(path) = find_non_finite(self) {
            return Err(StudioError::InvalidNumber { path });
        }
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }

    /// Single-line JSON text, as passed to `config.set`
    pub fn to_json_string(&self) -> Result<String> {
        if let Some(path) = find_non_finite(self) {
            return Err(StudioError::InvalidNumber { path });
        }
        Ok(serde_json::to_string(&self.to_json())?)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&SchemaValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SchemaValue> {
        self.fields.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable view of the fields in order. Keys are fixed; only values change.
    pub fn fields_mut(&mut self) -> &mut [(String, SchemaValue)] {
        &mut self.fields
    }

    pub fn fields(&self) -> &[(String, SchemaValue)] {
        &self.fields
    }
}

impl Serialize for SchemaObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchemaObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SchemaObject::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_preserves_key_order() {
        let obj = SchemaObject::parse_str(r#"{"zeta":1,"alpha":true,"mid":"COMBINATOR_AND"}"#)
            .unwrap();
        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_kinds_assigned_at_parse() {
        let obj = SchemaObject::parse_str(
            r#"{"on":false,"gain":1.5,"kind":"CONDITION_NONE","file":{"name":"a"},"conditions":[{"kind":"x"}]}"#,
        )
        .unwrap();
        let kinds: Vec<_> = obj.iter().map(|(_, v)| v.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ValueKind::Bool,
                ValueKind::Number,
                ValueKind::EnumString,
                ValueKind::Object,
                ValueKind::ObjectArray
            ]
        );
    }

    #[test]
    fn test_null_rejected_with_path() {
        let err = SchemaObject::parse_str(r#"{"file":{"name":null}}"#).unwrap_err();
        match err {
            StudioError::UnsupportedValue { path, .. } => assert_eq!(path, "file.name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_array_of_primitives_rejected() {
        let err = SchemaObject::parse_str(r#"{"list":[{"a":1},2]}"#).unwrap_err();
        match err {
            StudioError::UnsupportedValue { path, .. } => assert_eq!(path, "list[1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(SchemaObject::parse_str("[1,2]").is_err());
        assert!(SchemaObject::parse_str("3").is_err());
    }

    #[test]
    fn test_json_output_keeps_integers() {
        let obj = SchemaObject::new()
            .with_field("count", SchemaValue::Number(5.0))
            .with_field("ratio", SchemaValue::Number(0.25));
        assert_eq!(obj.to_json(), json!({"count": 5, "ratio": 0.25}));
    }

    #[test]
    fn test_overflowing_number_is_invalid_number() {
        let err = SchemaObject::parse_str(r#"{"a":1e400}"#).unwrap_err();
        assert_eq!(err.title(), "Invalid number");
        match err {
            StudioError::InvalidNumber { path } => assert_eq!(path, "line 1 column 10"),
            other => panic!("expected invalid number, got {other:?}"),
        }

        let err = SchemaObject::parse_str(r#"{"a":-1e999}"#).unwrap_err();
        assert!(matches!(err, StudioError::InvalidNumber { .. }));

        let err = SchemaObject::parse_str("{not json").unwrap_err();
        assert!(matches!(err, StudioError::Serialization(_)));
    }

    #[test]
    fn test_save_refuses_non_finite() {
        let obj = SchemaObject::new().with_field("x", SchemaValue::Number(f64::INFINITY));
        assert!(matches!(
            obj.to_json_string_pretty(),
            Err(StudioError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip_through_struct() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            doc: SchemaObject,
        }
        let holder: Holder =
            serde_json::from_str(r#"{"doc":{"b":1,"a":{"c":true}}}"#).unwrap();
        let text = serde_json::to_string(&holder).unwrap();
        assert_eq!(text, r#"{"doc":{"b":1,"a":{"c":true}}}"#);
    }

    #[test]
    fn test_with_field_replaces_existing() {
        let obj = SchemaObject::new()
            .with_field("a", SchemaValue::Bool(false))
            .with_field("a", SchemaValue::Bool(true));
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("a"), Some(&SchemaValue::Bool(true)));
    }
}
