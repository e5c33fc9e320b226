//! The primitive value/metadata merge protocol.
//!
//! On the wire a primitive field `f` spans up to two sibling keys: `f` holds
//! the bare value and `_f` holds a sidecar object (`id`, `extension`). Either
//! half may be absent; only when both are absent is the field itself absent.
//! Repeated primitive fields use two index-aligned arrays of equal length
//! with `null` placeholders for the missing half of each element.

use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};
use crate::object::WireObject;
use crate::scalars::{ParseError, Primitive};

/// The sidecar half of a primitive field. Implemented by the model layer's
/// `Element` type; the codec only needs to know when the sidecar is empty
/// enough to be dropped from the wire.
pub trait Sidecar: WireObject + Clone + std::fmt::Debug + PartialEq + Eq + std::hash::Hash {
    /// True when neither an id nor any extension is present.
    fn is_empty(&self) -> bool;
}

/// A primitive field value: an optional bare value plus optional sidecar
/// metadata. A populated field carries at least one of the two; the codec
/// never constructs (and never emits) an entirely empty shell for a present
/// scalar field. Both-empty slots inside repeated fields are the one
/// tolerated exception, preserved as-is for positional alignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FhirPrimitive<T, E> {
    pub value: Option<T>,
    pub element: Option<E>,
}

impl<T, E> FhirPrimitive<T, E> {
    pub fn new(value: T) -> Self {
        FhirPrimitive {
            value: Some(value),
            element: None,
        }
    }

    /// An "extension-only" primitive: value intentionally omitted but
    /// annotated through the sidecar.
    pub fn without_value(element: E) -> Self {
        FhirPrimitive {
            value: None,
            element: Some(element),
        }
    }

    pub fn with_element(value: T, element: E) -> Self {
        FhirPrimitive {
            value: Some(value),
            element: Some(element),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.element.is_none()
    }
}

impl<T, E> From<T> for FhirPrimitive<T, E> {
    fn from(value: T) -> Self {
        FhirPrimitive::new(value)
    }
}

fn parse_value<T: Primitive>(raw: &Value, path: &str) -> Result<T> {
    T::parse(raw).map_err(|e| match e {
        ParseError::WrongType(expected) => DecodeError::unexpected(path, expected),
        ParseError::Invalid(detail) => DecodeError::MalformedPrimitiveFormat {
            path: path.to_string(),
            type_name: T::TYPE_NAME,
            detail,
        },
    })
}

fn decode_sidecar<E: Sidecar>(raw: &Value, path: &str) -> Result<E> {
    match raw {
        Value::Object(obj) => E::decode(obj).map_err(|e| e.nested(path)),
        _ => Err(DecodeError::unexpected(path, "object")),
    }
}

impl<T: Primitive, E: Sidecar> FhirPrimitive<T, E> {
    /// Decode an optional scalar field from its `key`/`_key` pair.
    ///
    /// Both keys absent means the field is absent (`Ok(None)`); this is the
    /// only way "field omitted" is distinguished from "present but empty".
    pub fn decode(map: &Map<String, Value>, key: &str) -> Result<Option<Self>> {
        let aux_key = format!("_{key}");
        let raw = map.get(key).filter(|v| !v.is_null());
        let aux = map.get(&aux_key).filter(|v| !v.is_null());
        if raw.is_none() && aux.is_none() {
            return Ok(None);
        }
        let value = raw.map(|v| parse_value(v, key)).transpose()?;
        let element = aux.map(|v| decode_sidecar(v, &aux_key)).transpose()?;
        Ok(Some(FhirPrimitive { value, element }))
    }

    pub fn decode_required(map: &Map<String, Value>, key: &str) -> Result<Self> {
        Self::decode(map, key)?.ok_or_else(|| DecodeError::missing(key))
    }

    /// Decode a repeated scalar field from its parallel `key`/`_key` arrays.
    ///
    /// When both arrays are present their lengths must match exactly; `null`
    /// entries keep the two sequences positionally aligned.
    pub fn decode_vec(map: &Map<String, Value>, key: &str) -> Result<Option<Vec<Self>>> {
        let aux_key = format!("_{key}");
        let values = expect_array(map, key)?;
        let elements = expect_array(map, &aux_key)?;

        let len = match (values, elements) {
            (None, None) => return Ok(None),
            (Some(v), Some(e)) if v.len() != e.len() => {
                return Err(DecodeError::ArrayLengthMismatch {
                    path: key.to_string(),
                    values: v.len(),
                    elements: e.len(),
                });
            }
            (v, e) => v.or(e).map(|a| a.len()).unwrap_or(0),
        };

        let mut out = Vec::with_capacity(len);
        for index in 0..len {
            let raw = values.and_then(|a| a.get(index)).filter(|v| !v.is_null());
            let aux = elements.and_then(|a| a.get(index)).filter(|v| !v.is_null());
            let value = raw
                .map(|v| parse_value(v, &format!("{key}[{index}]")))
                .transpose()?;
            let element = aux
                .map(|v| decode_sidecar(v, &format!("{aux_key}[{index}]")))
                .transpose()?;
            out.push(FhirPrimitive { value, element });
        }
        Ok(Some(out))
    }

    /// Emit the `key`/`_key` pair for this field. An empty shell emits
    /// nothing at all; callers must not have constructed one for a present
    /// non-repeated field.
    pub fn encode(&self, map: &mut Map<String, Value>, key: &str) {
        if let Some(value) = &self.value {
            map.insert(key.to_string(), value.to_json());
        }
        if let Some(element) = &self.element {
            if !element.is_empty() {
                map.insert(format!("_{key}"), element.to_value());
            }
        }
    }

    /// Emit the parallel arrays for a repeated field. An array that would be
    /// entirely `null` is dropped; the surviving arrays keep the full length
    /// so indices stay aligned.
    pub fn encode_vec(items: &[Self], map: &mut Map<String, Value>, key: &str) {
        if items.is_empty() {
            return;
        }
        let mut values = Vec::with_capacity(items.len());
        let mut elements = Vec::with_capacity(items.len());
        let mut any_value = false;
        let mut any_element = false;
        for item in items {
            match &item.value {
                Some(value) => {
                    any_value = true;
                    values.push(value.to_json());
                }
                None => values.push(Value::Null),
            }
            match &item.element {
                Some(element) if !element.is_empty() => {
                    any_element = true;
                    elements.push(element.to_value());
                }
                _ => elements.push(Value::Null),
            }
        }
        if any_value {
            map.insert(key.to_string(), Value::Array(values));
        }
        if any_element {
            map.insert(format!("_{key}"), Value::Array(elements));
        }
    }

    /// Encode an optional repeated field.
    pub fn encode_vec_opt(items: &Option<Vec<Self>>, map: &mut Map<String, Value>, key: &str) {
        if let Some(items) = items {
            Self::encode_vec(items, map, key);
        }
    }
}

/// Encode an optional scalar field.
pub fn encode_primitive<T: Primitive, E: Sidecar>(
    field: &Option<FhirPrimitive<T, E>>,
    map: &mut Map<String, Value>,
    key: &str,
) {
    if let Some(field) = field {
        field.encode(map, key);
    }
}

fn expect_array<'a>(map: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(DecodeError::unexpected(key, "array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::decode_string;
    use serde_json::json;

    /// Minimal sidecar carrying just an id, standing in for the model
    /// layer's Element.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
    struct TestSidecar {
        id: Option<String>,
    }

    impl WireObject for TestSidecar {
        fn decode(map: &Map<String, Value>) -> Result<Self> {
            Ok(TestSidecar {
                id: decode_string(map, "id")?,
            })
        }

        fn encode(&self, map: &mut Map<String, Value>) {
            if let Some(id) = &self.id {
                map.insert("id".into(), Value::String(id.clone()));
            }
        }
    }

    impl Sidecar for TestSidecar {
        fn is_empty(&self) -> bool {
            self.id.is_none()
        }
    }

    type P<T> = FhirPrimitive<T, TestSidecar>;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn sidecar(id: &str) -> TestSidecar {
        TestSidecar {
            id: Some(id.into()),
        }
    }

    #[test]
    fn value_only() {
        let map = obj(json!({ "active": true }));
        let p = P::<bool>::decode(&map, "active").unwrap().unwrap();
        assert_eq!(p.value, Some(true));
        assert!(p.element.is_none());
    }

    #[test]
    fn sidecar_only() {
        let map = obj(json!({ "_active": { "id": "a1" } }));
        let p = P::<bool>::decode(&map, "active").unwrap().unwrap();
        assert!(p.value.is_none());
        assert_eq!(p.element, Some(sidecar("a1")));
    }

    #[test]
    fn both_halves_merge() {
        let map = obj(json!({ "active": false, "_active": { "id": "a1" } }));
        let p = P::<bool>::decode(&map, "active").unwrap().unwrap();
        assert_eq!(p.value, Some(false));
        assert_eq!(p.element, Some(sidecar("a1")));
    }

    #[test]
    fn both_absent_is_absent_not_empty() {
        let map = obj(json!({ "other": 1 }));
        assert!(P::<bool>::decode(&map, "active").unwrap().is_none());
    }

    #[test]
    fn grammar_violation_cites_key_and_text() {
        let map = obj(json!({ "birthDate": "not-a-date" }));
        let err = P::<crate::scalars::Date>::decode(&map, "birthDate").unwrap_err();
        match &err {
            DecodeError::MalformedPrimitiveFormat {
                path,
                type_name,
                detail,
            } => {
                assert_eq!(path, "birthDate");
                assert_eq!(*type_name, "date");
                assert!(detail.contains("not-a-date"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn required_scalar_missing() {
        let map = obj(json!({}));
        let err = P::<bool>::decode_required(&map, "active").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "active");
    }

    #[test]
    fn sidecar_only_round_trip() {
        let p = P::<bool>::without_value(sidecar("a1"));
        let mut map = Map::new();
        p.encode(&mut map, "active");
        assert!(!map.contains_key("active"));
        assert_eq!(map.get("_active"), Some(&json!({ "id": "a1" })));

        let back = P::<bool>::decode(&map, "active").unwrap().unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn empty_sidecar_is_dropped_on_encode() {
        let p = P::<bool>::with_element(true, TestSidecar::default());
        let mut map = Map::new();
        p.encode(&mut map, "active");
        assert_eq!(map.get("active"), Some(&json!(true)));
        assert!(!map.contains_key("_active"));
    }

    #[test]
    fn parallel_arrays_align_by_index() {
        let map = obj(json!({
            "count": [1, 2, null],
            "_count": [null, { "id": "x" }, null],
        }));
        let items = P::<i32>::decode_vec(&map, "count").unwrap().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], P::new(1));
        assert_eq!(items[1], P::with_element(2, sidecar("x")));
        assert!(items[2].is_empty());

        let mut out = Map::new();
        P::encode_vec(&items, &mut out, "count");
        assert_eq!(out.get("count"), Some(&json!([1, 2, null])));
        assert_eq!(out.get("_count"), Some(&json!([null, { "id": "x" }, null])));
    }

    #[test]
    fn unequal_parallel_arrays_are_rejected() {
        let map = obj(json!({ "count": [1, 2], "_count": [null] }));
        let err = P::<i32>::decode_vec(&map, "count").unwrap_err();
        match err {
            DecodeError::ArrayLengthMismatch {
                path,
                values,
                elements,
            } => {
                assert_eq!(path, "count");
                assert_eq!((values, elements), (2, 1));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn value_array_alone_decodes() {
        let map = obj(json!({ "line": ["a", "b"] }));
        let items = P::<String>::decode_vec(&map, "line").unwrap().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.element.is_none()));
    }

    #[test]
    fn sidecar_array_alone_decodes() {
        let map = obj(json!({ "_line": [{ "id": "l0" }] }));
        let items = P::<String>::decode_vec(&map, "line").unwrap().unwrap();
        assert_eq!(items, vec![P::without_value(sidecar("l0"))]);
    }

    #[test]
    fn all_null_value_array_is_dropped_on_encode() {
        let items = vec![P::<i32>::without_value(sidecar("only-meta"))];
        let mut map = Map::new();
        P::encode_vec(&items, &mut map, "count");
        assert!(!map.contains_key("count"));
        assert_eq!(map.get("_count"), Some(&json!([{ "id": "only-meta" }])));
    }

    #[test]
    fn array_element_errors_carry_the_index() {
        let map = obj(json!({ "given": ["Adam", 7] }));
        let err = P::<String>::decode_vec(&map, "given").unwrap_err();
        assert_eq!(err.path(), "given[1]");
    }
}
