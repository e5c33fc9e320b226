//! The type-erased resource container.
//!
//! Wherever a slot may hold any registered resource kind (contained
//! resources, bundle entries), the wire object is resolved through its
//! `resourceType` discriminator into a [`ResourceProxy`]. The registry is a
//! compile-time perfect hash map from kind name to decoder; encode delegates
//! to the wrapped value, which re-emits its own discriminator literal, so
//! the proxy holds no separate discriminator state.

use phf::phf_map;
use serde_json::{Map, Value};

use osmium_wire::{decode_string, require, DecodeError, Result, WireObject};

use crate::resources::{Bundle, Observation, OperationOutcome, Patient};

/// A closed sum over every registered concrete resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceProxy {
    Bundle(Bundle),
    Observation(Observation),
    OperationOutcome(OperationOutcome),
    Patient(Patient),
}

type Decoder = fn(&Map<String, Value>) -> Result<ResourceProxy>;

fn decode_bundle(map: &Map<String, Value>) -> Result<ResourceProxy> {
    Bundle::decode(map).map(ResourceProxy::Bundle)
}

fn decode_observation(map: &Map<String, Value>) -> Result<ResourceProxy> {
    Observation::decode(map).map(ResourceProxy::Observation)
}

fn decode_operation_outcome(map: &Map<String, Value>) -> Result<ResourceProxy> {
    OperationOutcome::decode(map).map(ResourceProxy::OperationOutcome)
}

fn decode_patient(map: &Map<String, Value>) -> Result<ResourceProxy> {
    Patient::decode(map).map(ResourceProxy::Patient)
}

static DECODERS: phf::Map<&'static str, Decoder> = phf_map! {
    "Bundle" => decode_bundle,
    "Observation" => decode_observation,
    "OperationOutcome" => decode_operation_outcome,
    "Patient" => decode_patient,
};

impl ResourceProxy {
    /// Every registered kind name, in variant order. Kept in sync with the
    /// decoder table by a unit test.
    pub const KINDS: &'static [&'static str] =
        &["Bundle", "Observation", "OperationOutcome", "Patient"];

    /// The wrapped value's kind name.
    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceProxy::Bundle(_) => "Bundle",
            ResourceProxy::Observation(_) => "Observation",
            ResourceProxy::OperationOutcome(_) => "OperationOutcome",
            ResourceProxy::Patient(_) => "Patient",
        }
    }

    pub fn as_bundle(&self) -> Option<&Bundle> {
        match self {
            ResourceProxy::Bundle(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_observation(&self) -> Option<&Observation> {
        match self {
            ResourceProxy::Observation(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_operation_outcome(&self) -> Option<&OperationOutcome> {
        match self {
            ResourceProxy::OperationOutcome(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_patient(&self) -> Option<&Patient> {
        match self {
            ResourceProxy::Patient(resource) => Some(resource),
            _ => None,
        }
    }
}

impl WireObject for ResourceProxy {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        let name = require(decode_string(map, "resourceType")?, "resourceType")?;
        match DECODERS.get(name.as_str()) {
            Some(decoder) => decoder(map),
            None => Err(DecodeError::UnknownDiscriminator {
                path: "resourceType".to_string(),
                name,
            }),
        }
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        match self {
            ResourceProxy::Bundle(resource) => resource.encode(map),
            ResourceProxy::Observation(resource) => resource.encode(map),
            ResourceProxy::OperationOutcome(resource) => resource.encode(map),
            ResourceProxy::Patient(resource) => resource.encode(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn registry_matches_kind_list() {
        assert_eq!(DECODERS.len(), ResourceProxy::KINDS.len());
        for kind in ResourceProxy::KINDS {
            assert!(DECODERS.contains_key(kind), "no decoder registered for {kind}");
        }
    }

    #[test]
    fn narrowing_accessor_matches_only_its_kind() {
        let map = obj(json!({ "resourceType": "Patient", "id": "pat-1" }));
        let proxy = ResourceProxy::decode(&map).unwrap();
        assert_eq!(proxy.resource_type(), "Patient");
        assert!(proxy.as_patient().is_some());
        assert!(proxy.as_observation().is_none());
        assert!(proxy.as_bundle().is_none());
    }

    #[test]
    fn unregistered_kind_fails() {
        let map = obj(json!({ "resourceType": "Frobnicate" }));
        let err = ResourceProxy::decode(&map).unwrap_err();
        match err {
            DecodeError::UnknownDiscriminator { name, .. } => assert_eq!(name, "Frobnicate"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_discriminator_fails() {
        let err = ResourceProxy::decode(&obj(json!({ "id": "x" }))).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "resourceType");
    }

    #[test]
    fn encode_delegates_to_the_wrapped_resource() {
        let map = obj(json!({ "resourceType": "Patient", "id": "pat-1" }));
        let proxy = ResourceProxy::decode(&map).unwrap();
        assert_eq!(proxy.to_map(), map);
    }
}
