//! End-to-end round-trip tests over full resource graphs.

use osmium_models::{
    DecodeError, Element, Extension, ExtensionValue, FhirPrimitive, FhirResource, Patient,
    ResourceProxy, WireObject,
};
use serde_json::{json, Value};

fn patient_fixture() -> Value {
    json!({
        "resourceType": "Patient",
        "id": "pat-1",
        "meta": {
            "versionId": "3",
            "lastUpdated": "2023-06-01T08:30:00Z",
            "tag": [{ "system": "http://example.org/tags", "code": "test" }]
        },
        "text": {
            "status": "generated",
            "div": "<div xmlns=\"http://www.w3.org/1999/xhtml\">Eve Everywoman</div>"
        },
        "extension": [{
            "url": "http://hl7.org/fhir/StructureDefinition/patient-birthPlace",
            "valueAddress": { "city": "Adelaide", "country": "AU" }
        }],
        "identifier": [{
            "system": "urn:oid:1.2.36.146.595.217.0.1",
            "value": "12345",
            "assigner": { "display": "Acme Healthcare" }
        }],
        "active": true,
        "name": [{
            "use": "official",
            "family": "Everywoman",
            "given": ["Eve", null],
            "_given": [null, { "extension": [{
                "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
                "valueCode": "unknown"
            }] }]
        }],
        "telecom": [{ "system": "phone", "value": "555-1234", "use": "home" }],
        "gender": "female",
        "birthDate": "1974-12-25",
        "_birthDate": { "id": "bd1" },
        "deceasedBoolean": false,
        "address": [{ "line": ["123 Example St"], "city": "Adelaide", "country": "AU" }],
        "multipleBirthInteger": 2,
        "managingOrganization": { "reference": "Organization/org-1" }
    })
}

#[test]
fn full_patient_round_trips_losslessly() {
    let value = patient_fixture();
    let patient = Patient::from_value(&value).unwrap();
    assert_eq!(patient.to_value(), value);
}

#[test]
fn decode_encode_decode_is_equal_under_value_equality() {
    let value = patient_fixture();
    let first = Patient::from_value(&value).unwrap();
    let second = Patient::from_value(&first.to_value()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn byte_identical_json_decodes_to_equal_graphs() {
    let a = Patient::from_value(&patient_fixture()).unwrap();
    let b = Patient::from_value(&patient_fixture()).unwrap();
    assert_eq!(a, b);

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut ha = DefaultHasher::new();
    let mut hb = DefaultHasher::new();
    a.hash(&mut ha);
    b.hash(&mut hb);
    assert_eq!(ha.finish(), hb.finish());
}

#[test]
fn one_deep_extension_breaks_equality() {
    let a = Patient::from_value(&patient_fixture()).unwrap();
    let mut value = patient_fixture();
    value["name"][0]["_given"][0] = json!({ "extension": [{
        "url": "http://example.org/preferred",
        "valueBoolean": true
    }] });
    let b = Patient::from_value(&value).unwrap();
    assert_ne!(a, b);
}

#[test]
fn extension_only_primitive_emits_only_the_underscore_key() {
    let patient = Patient {
        birth_date: Some(FhirPrimitive::without_value(Element::with_extensions(vec![
            Extension::with_value(
                "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
                ExtensionValue::Code(FhirPrimitive::new(
                    osmium_models::Code::new("asked-declined").unwrap(),
                )),
            ),
        ]))),
        ..Default::default()
    };
    let map = patient.to_map();
    assert!(!map.contains_key("birthDate"));
    assert!(map.contains_key("_birthDate"));

    let back = Patient::decode(&map).unwrap();
    assert_eq!(back.birth_date, patient.birth_date);
}

#[test]
fn contained_resources_resolve_polymorphically() {
    let value = json!({
        "resourceType": "Patient",
        "id": "pat-1",
        "contained": [{
            "resourceType": "Observation",
            "id": "obs-1",
            "status": "final",
            "code": { "text": "Heart rate" },
            "valueInteger": 72
        }]
    });
    let patient = Patient::from_value(&value).unwrap();
    let contained = patient.domain.contained.as_ref().unwrap();
    assert_eq!(contained.len(), 1);
    let observation = contained[0].as_observation().unwrap();
    assert_eq!(observation.id().unwrap().as_str(), "obs-1");
    assert!(contained[0].as_patient().is_none());
    assert_eq!(patient.to_value(), value);
}

#[test]
fn contained_unknown_kind_fails_with_full_path() {
    let value = json!({
        "resourceType": "Patient",
        "contained": [{ "resourceType": "Frobnicate" }]
    });
    let err = Patient::from_value(&value).unwrap_err();
    match &err {
        DecodeError::UnknownDiscriminator { name, .. } => assert_eq!(name, "Frobnicate"),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.path(), "contained[0].resourceType");
}

#[test]
fn proxy_round_trips_through_the_discriminator() {
    let value = patient_fixture();
    let proxy = ResourceProxy::from_value(&value).unwrap();
    assert_eq!(proxy.resource_type(), "Patient");
    assert_eq!(proxy.to_value(), value);
    assert_eq!(
        proxy.as_patient().unwrap(),
        &Patient::from_value(&value).unwrap()
    );
}

#[test]
fn decode_rejects_partial_graphs_atomically() {
    // The trailing malformed birthDate must poison the whole decode even
    // though every earlier field is valid.
    let mut value = patient_fixture();
    value["birthDate"] = json!("25-12-1974");
    let err = Patient::from_value(&value).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPrimitiveFormat { .. }));
}
