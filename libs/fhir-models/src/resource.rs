//! Resource base composition and the concrete-resource contract.
//!
//! Instead of an inheritance chain, every concrete resource embeds a
//! [`Resource`] (or a [`DomainResource`], which itself embeds one) as its
//! first field and decodes/encodes it before its own fields. The
//! `resourceType` discriminator is a literal field owned by the concrete
//! type: decode verifies it, encode re-emits it first.

use serde_json::{Map, Value};

use osmium_wire::{
    decode_field, decode_field_vec, decode_string, encode_field, encode_field_vec,
    encode_primitive, require, Code, DecodeError, Id, Result, Uri, WireObject,
};

use crate::datatypes::{Meta, Narrative};
use crate::element::{Extension, FhirPrimitive};
use crate::proxy::ResourceProxy;

/// Fields shared by every top-level resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Resource {
    pub id: Option<FhirPrimitive<Id>>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<FhirPrimitive<Uri>>,
    pub language: Option<FhirPrimitive<Code>>,
}

impl WireObject for Resource {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Resource {
            id: FhirPrimitive::decode(map, "id")?,
            meta: decode_field(map, "meta")?,
            implicit_rules: FhirPrimitive::decode(map, "implicitRules")?,
            language: FhirPrimitive::decode(map, "language")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        encode_primitive(&self.id, map, "id");
        encode_field(&self.meta, map, "meta");
        encode_primitive(&self.implicit_rules, map, "implicitRules");
        encode_primitive(&self.language, map, "language");
    }
}

/// Resource base for domain resources: narrative, contained resources and
/// extensions on top of [`Resource`]. The contained list is the polymorphic
/// slot — each entry is a discriminated object resolved through
/// [`ResourceProxy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomainResource {
    pub resource: Resource,
    pub text: Option<Narrative>,
    pub contained: Option<Vec<ResourceProxy>>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
}

impl WireObject for DomainResource {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(DomainResource {
            resource: Resource::decode(map)?,
            text: decode_field(map, "text")?,
            contained: decode_field_vec(map, "contained")?,
            extension: decode_field_vec(map, "extension")?,
            modifier_extension: decode_field_vec(map, "modifierExtension")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.resource.encode(map);
        encode_field(&self.text, map, "text");
        encode_field_vec(&self.contained, map, "contained");
        encode_field_vec(&self.extension, map, "extension");
        encode_field_vec(&self.modifier_extension, map, "modifierExtension");
    }
}

/// Contract implemented by every concrete resource kind.
pub trait FhirResource: WireObject {
    /// The registered kind name, emitted as the `resourceType` literal.
    const RESOURCE_TYPE: &'static str;

    /// The embedded shared resource fields.
    fn resource(&self) -> &Resource;

    /// The logical id, when present with a value.
    fn id(&self) -> Option<&Id> {
        self.resource().id.as_ref().and_then(|id| id.value.as_ref())
    }
}

/// Verify the discriminator before decoding a concrete kind. A missing
/// discriminator is a missing required value; a different kind name is
/// rejected the same way an unregistered one is.
pub(crate) fn check_resource_type(map: &Map<String, Value>, expected: &'static str) -> Result<()> {
    let name = require(decode_string(map, "resourceType")?, "resourceType")?;
    if name != expected {
        return Err(DecodeError::UnknownDiscriminator {
            path: "resourceType".to_string(),
            name,
        });
    }
    Ok(())
}

pub(crate) fn write_resource_type(map: &mut Map<String, Value>, resource_type: &'static str) {
    map.insert(
        "resourceType".to_string(),
        Value::String(resource_type.to_string()),
    );
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
    fn resource_header_round_trip() {
        let map = obj(json!({
            "id": "pat-1",
            "meta": { "versionId": "3", "lastUpdated": "2023-01-01T00:00:00Z" },
            "language": "en-AU"
        }));
        let resource = Resource::decode(&map).unwrap();
        assert_eq!(resource.id.as_ref().and_then(|id| id.value.as_ref()).unwrap().as_str(), "pat-1");
        assert_eq!(resource.to_map(), map);
    }

    #[test]
    fn discriminator_must_be_present() {
        let err = check_resource_type(&obj(json!({})), "Patient").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "resourceType");
    }

    #[test]
    fn discriminator_must_match() {
        let map = obj(json!({ "resourceType": "Observation" }));
        let err = check_resource_type(&map, "Patient").unwrap_err();
        match err {
            DecodeError::UnknownDiscriminator { name, .. } => assert_eq!(name, "Observation"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
