//! A container for a collection of resources.
//!
//! Bundle is a plain resource (no narrative, no extensions of its own); its
//! entries are the other polymorphic slot besides `contained`, each holding
//! a discriminated resource object.

use serde_json::{Map, Value};

use osmium_wire::{
    decode_field, decode_field_vec, encode_field, encode_field_vec, encode_primitive, Code,
    Instant, Result, Uri, UnsignedInt, WireObject,
};

use crate::datatypes::Identifier;
use crate::element::{BackboneElement, FhirPrimitive};
use crate::proxy::ResourceProxy;
use crate::resource::{check_resource_type, write_resource_type, FhirResource, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bundle {
    pub resource: Resource,
    /// Persistent identifier for the bundle as a whole.
    pub identifier: Option<Identifier>,
    /// document | message | transaction | batch | history | searchset |
    /// collection | ... (required).
    pub r#type: FhirPrimitive<Code>,
    pub timestamp: Option<FhirPrimitive<Instant>>,
    /// If search, the total number of matches.
    pub total: Option<FhirPrimitive<UnsignedInt>>,
    pub link: Option<Vec<BundleLink>>,
    pub entry: Option<Vec<BundleEntry>>,
}

impl Bundle {
    pub fn new(r#type: FhirPrimitive<Code>) -> Self {
        Bundle {
            resource: Resource::default(),
            identifier: None,
            r#type,
            timestamp: None,
            total: None,
            link: None,
            entry: None,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entry.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    pub fn entries(&self) -> &[BundleEntry] {
        self.entry.as_deref().unwrap_or(&[])
    }
}

/// Links related to this Bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleLink {
    pub backbone: BackboneElement,
    pub relation: FhirPrimitive<String>,
    pub url: FhirPrimitive<Uri>,
}

impl WireObject for BundleLink {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(BundleLink {
            backbone: BackboneElement::decode(map)?,
            relation: FhirPrimitive::decode_required(map, "relation")?,
            url: FhirPrimitive::decode_required(map, "url")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        self.relation.encode(map, "relation");
        self.url.encode(map, "url");
    }
}

/// Entry in the bundle: a resource and/or request/response information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BundleEntry {
    pub backbone: BackboneElement,
    pub full_url: Option<FhirPrimitive<Uri>>,
    pub resource: Option<ResourceProxy>,
    pub search: Option<BundleEntrySearch>,
    pub request: Option<BundleEntryRequest>,
    pub response: Option<BundleEntryResponse>,
}

impl WireObject for BundleEntry {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(BundleEntry {
            backbone: BackboneElement::decode(map)?,
            full_url: FhirPrimitive::decode(map, "fullUrl")?,
            resource: decode_field(map, "resource")?,
            search: decode_field(map, "search")?,
            request: decode_field(map, "request")?,
            response: decode_field(map, "response")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        encode_primitive(&self.full_url, map, "fullUrl");
        encode_field(&self.resource, map, "resource");
        encode_field(&self.search, map, "search");
        encode_field(&self.request, map, "request");
        encode_field(&self.response, map, "response");
    }
}

/// Search-related information for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BundleEntrySearch {
    pub backbone: BackboneElement,
    /// match | include | outcome.
    pub mode: Option<FhirPrimitive<Code>>,
    pub score: Option<FhirPrimitive<osmium_wire::Decimal>>,
}

impl WireObject for BundleEntrySearch {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(BundleEntrySearch {
            backbone: BackboneElement::decode(map)?,
            mode: FhirPrimitive::decode(map, "mode")?,
            score: FhirPrimitive::decode(map, "score")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        encode_primitive(&self.mode, map, "mode");
        encode_primitive(&self.score, map, "score");
    }
}

/// Transaction/batch request details for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleEntryRequest {
    pub backbone: BackboneElement,
    /// GET | HEAD | POST | PUT | DELETE | PATCH (required).
    pub method: FhirPrimitive<Code>,
    pub url: FhirPrimitive<Uri>,
    pub if_none_match: Option<FhirPrimitive<String>>,
    pub if_modified_since: Option<FhirPrimitive<Instant>>,
    pub if_match: Option<FhirPrimitive<String>>,
    pub if_none_exist: Option<FhirPrimitive<String>>,
}

impl WireObject for BundleEntryRequest {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(BundleEntryRequest {
            backbone: BackboneElement::decode(map)?,
            method: FhirPrimitive::decode_required(map, "method")?,
            url: FhirPrimitive::decode_required(map, "url")?,
            if_none_match: FhirPrimitive::decode(map, "ifNoneMatch")?,
            if_modified_since: FhirPrimitive::decode(map, "ifModifiedSince")?,
            if_match: FhirPrimitive::decode(map, "ifMatch")?,
            if_none_exist: FhirPrimitive::decode(map, "ifNoneExist")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        self.method.encode(map, "method");
        self.url.encode(map, "url");
        encode_primitive(&self.if_none_match, map, "ifNoneMatch");
        encode_primitive(&self.if_modified_since, map, "ifModifiedSince");
        encode_primitive(&self.if_match, map, "ifMatch");
        encode_primitive(&self.if_none_exist, map, "ifNoneExist");
    }
}

/// Transaction/batch/history execution results for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleEntryResponse {
    pub backbone: BackboneElement,
    /// Status response code, e.g. `201 Created` (required).
    pub status: FhirPrimitive<String>,
    pub location: Option<FhirPrimitive<Uri>>,
    pub etag: Option<FhirPrimitive<String>>,
    pub last_modified: Option<FhirPrimitive<Instant>>,
    /// OperationOutcome (or other resource) with hints and warnings.
    pub outcome: Option<ResourceProxy>,
}

impl WireObject for BundleEntryResponse {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(BundleEntryResponse {
            backbone: BackboneElement::decode(map)?,
            status: FhirPrimitive::decode_required(map, "status")?,
            location: FhirPrimitive::decode(map, "location")?,
            etag: FhirPrimitive::decode(map, "etag")?,
            last_modified: FhirPrimitive::decode(map, "lastModified")?,
            outcome: decode_field(map, "outcome")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        self.status.encode(map, "status");
        encode_primitive(&self.location, map, "location");
        encode_primitive(&self.etag, map, "etag");
        encode_primitive(&self.last_modified, map, "lastModified");
        encode_field(&self.outcome, map, "outcome");
    }
}

impl FhirResource for Bundle {
    const RESOURCE_TYPE: &'static str = "Bundle";

    fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl WireObject for Bundle {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        check_resource_type(map, Self::RESOURCE_TYPE)?;
        Ok(Bundle {
            resource: Resource::decode(map)?,
            identifier: decode_field(map, "identifier")?,
            r#type: FhirPrimitive::decode_required(map, "type")?,
            timestamp: FhirPrimitive::decode(map, "timestamp")?,
            total: FhirPrimitive::decode(map, "total")?,
            link: decode_field_vec(map, "link")?,
            entry: decode_field_vec(map, "entry")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        write_resource_type(map, Self::RESOURCE_TYPE);
        self.resource.encode(map);
        encode_field(&self.identifier, map, "identifier");
        self.r#type.encode(map, "type");
        encode_primitive(&self.timestamp, map, "timestamp");
        encode_primitive(&self.total, map, "total");
        encode_field_vec(&self.link, map, "link");
        encode_field_vec(&self.entry, map, "entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmium_wire::DecodeError;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn searchset_with_patient_entry() {
        let map = obj(json!({
            "resourceType": "Bundle",
            "id": "example-bundle",
            "type": "searchset",
            "total": 1,
            "link": [{ "relation": "self", "url": "http://example.org/fhir/Patient?_id=pat-1" }],
            "entry": [{
                "fullUrl": "http://example.org/fhir/Patient/pat-1",
                "resource": { "resourceType": "Patient", "id": "pat-1" },
                "search": { "mode": "match", "score": 1 }
            }]
        }));
        let bundle = Bundle::decode(&map).unwrap();
        assert_eq!(bundle.entry_count(), 1);
        let resource = bundle.entries()[0].resource.as_ref().unwrap();
        assert!(resource.as_patient().is_some());
        assert!(resource.as_operation_outcome().is_none());
        assert_eq!(bundle.to_map(), map);
    }

    #[test]
    fn bundle_type_is_required() {
        let map = obj(json!({ "resourceType": "Bundle" }));
        let err = Bundle::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "type");
    }

    #[test]
    fn unknown_entry_resource_kind_fails_with_path() {
        let map = obj(json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [{ "resource": { "resourceType": "Frobnicate" } }]
        }));
        let err = Bundle::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownDiscriminator { .. }));
        assert_eq!(err.path(), "entry[0].resource.resourceType");
    }

    #[test]
    fn negative_total_is_malformed() {
        let map = obj(json!({ "resourceType": "Bundle", "type": "searchset", "total": -3 }));
        let err = Bundle::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPrimitiveFormat { .. }));
        assert_eq!(err.path(), "total");
    }
}
