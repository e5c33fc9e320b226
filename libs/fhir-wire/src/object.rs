//! The keyed-container protocol shared by every complex FHIR type.
//!
//! The container is a `serde_json::Map` (insertion-ordered with the
//! `preserve_order` feature); key order is never wire-significant and decode
//! tolerates any ordering. Composite types decode their embedded base value
//! first, then their own fields, so equality and hashing chain base-first.

use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};

/// Decode/encode against a keyed JSON container.
///
/// `decode` either yields a complete value or a single terminal error;
/// `encode` writes into a fresh or partially-built container and cannot fail
/// for values that satisfy the construction invariants.
pub trait WireObject: Sized {
    fn decode(map: &Map<String, Value>) -> Result<Self>;
    fn encode(&self, map: &mut Map<String, Value>);

    /// Decode from an arbitrary JSON value, requiring an object.
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::decode(map),
            _ => Err(DecodeError::unexpected("", "object")),
        }
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        self.encode(&mut map);
        map
    }

    fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl<T: WireObject> WireObject for Box<T> {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        T::decode(map).map(Box::new)
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        (**self).encode(map);
    }
}

/// Decode an optional nested object field.
pub fn decode_field<T: WireObject>(map: &Map<String, Value>, key: &str) -> Result<Option<T>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(obj)) => T::decode(obj).map(Some).map_err(|e| e.nested(key)),
        Some(_) => Err(DecodeError::unexpected(key, "object")),
    }
}

/// Decode an optional repeated object field.
pub fn decode_field_vec<T: WireObject>(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<T>>> {
    let items = match map.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(DecodeError::unexpected(key, "array")),
    };
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(obj) => {
                out.push(T::decode(obj).map_err(|e| e.nested_at(key, index))?);
            }
            _ => return Err(DecodeError::unexpected(format!("{key}[{index}]"), "object")),
        }
    }
    Ok(Some(out))
}

/// Decode an optional bare JSON string field (discriminators, element ids,
/// extension urls — scalars that never carry a sidecar).
pub fn decode_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::unexpected(key, "string")),
    }
}

/// Turn an absent optional field into `MissingRequiredValue`.
pub fn require<T>(field: Option<T>, key: &str) -> Result<T> {
    field.ok_or_else(|| DecodeError::missing(key))
}

pub fn encode_field<T: WireObject>(field: &Option<T>, map: &mut Map<String, Value>, key: &str) {
    if let Some(value) = field {
        map.insert(key.to_string(), value.to_value());
    }
}

pub fn encode_field_vec<T: WireObject>(
    field: &Option<Vec<T>>,
    map: &mut Map<String, Value>,
    key: &str,
) {
    if let Some(items) = field {
        if items.is_empty() {
            return;
        }
        let values = items.iter().map(WireObject::to_value).collect();
        map.insert(key.to_string(), Value::Array(values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Pair {
        relation: Option<String>,
        url: Option<String>,
    }

    impl WireObject for Pair {
        fn decode(map: &Map<String, Value>) -> Result<Self> {
            Ok(Pair {
                relation: decode_string(map, "relation")?,
                url: decode_string(map, "url")?,
            })
        }

        fn encode(&self, map: &mut Map<String, Value>) {
            if let Some(relation) = &self.relation {
                map.insert("relation".into(), Value::String(relation.clone()));
            }
            if let Some(url) = &self.url {
                map.insert("url".into(), Value::String(url.clone()));
            }
        }
    }

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn absent_field_decodes_to_none() {
        let map = obj(json!({}));
        let pair: Option<Pair> = decode_field(&map, "link").unwrap();
        assert!(pair.is_none());
    }

    #[test]
    fn wrong_container_shape_is_rejected() {
        let map = obj(json!({ "link": 42 }));
        let err = decode_field::<Pair>(&map, "link").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedJsonType { .. }));
        assert_eq!(err.path(), "link");
    }

    #[test]
    fn nested_errors_carry_indexed_paths() {
        let map = obj(json!({ "link": [{ "relation": "self" }, { "url": 1 }] }));
        let err = decode_field_vec::<Pair>(&map, "link").unwrap_err();
        assert_eq!(err.path(), "link[1].url");
    }

    #[test]
    fn empty_vec_is_not_encoded() {
        let mut map = Map::new();
        encode_field_vec::<Pair>(&Some(Vec::new()), &mut map, "link");
        assert!(map.is_empty());
    }

    #[test]
    fn require_reports_the_field_key() {
        let err = require::<Pair>(None, "url").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "url");
    }
}
