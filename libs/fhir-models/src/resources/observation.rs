//! Measurements and simple assertions made about a patient.

use serde_json::{Map, Value};

use osmium_wire::{
    choice, decode_field, decode_field_vec, encode_field, encode_field_vec, encode_primitive,
    require, Code, DateTime, Instant, Result, WireObject,
};

use crate::datatypes::{CodeableConcept, Identifier, Period, Quantity, Reference};
use crate::element::{BackboneElement, FhirPrimitive};
use crate::resource::{check_resource_type, write_resource_type, DomainResource, FhirResource, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    pub domain: DomainResource,
    pub identifier: Option<Vec<Identifier>>,
    /// Registered | preliminary | final | amended | ... (required).
    pub status: FhirPrimitive<Code>,
    pub category: Option<Vec<CodeableConcept>>,
    /// What was observed (required).
    pub code: CodeableConcept,
    pub subject: Option<Reference>,
    pub encounter: Option<Reference>,
    /// One of `effective[x]`.
    pub effective: Option<ObservationEffective>,
    pub issued: Option<FhirPrimitive<Instant>>,
    /// One of `value[x]`.
    pub value: Option<ObservationValue>,
    pub data_absent_reason: Option<CodeableConcept>,
    pub reference_range: Option<Vec<ObservationReferenceRange>>,
}

impl Observation {
    pub fn new(status: FhirPrimitive<Code>, code: CodeableConcept) -> Self {
        Observation {
            domain: DomainResource::default(),
            identifier: None,
            status,
            category: None,
            code,
            subject: None,
            encounter: None,
            effective: None,
            issued: None,
            value: None,
            data_absent_reason: None,
            reference_range: None,
        }
    }
}

/// All possible types for `effective[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObservationEffective {
    DateTime(FhirPrimitive<DateTime>),
    Period(Period),
    Instant(FhirPrimitive<Instant>),
}

impl ObservationEffective {
    fn decode(map: &Map<String, Value>) -> Result<Option<Self>> {
        let mut slot = choice::Slot::default();
        if let Some(v) = FhirPrimitive::decode(map, "effectiveDateTime")? {
            choice::claim(
                &mut slot,
                "effective",
                "effectiveDateTime",
                ObservationEffective::DateTime(v),
            )?;
        }
        if let Some(v) = decode_field(map, "effectivePeriod")? {
            choice::claim(
                &mut slot,
                "effective",
                "effectivePeriod",
                ObservationEffective::Period(v),
            )?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "effectiveInstant")? {
            choice::claim(
                &mut slot,
                "effective",
                "effectiveInstant",
                ObservationEffective::Instant(v),
            )?;
        }
        Ok(choice::finish(slot))
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        match self {
            ObservationEffective::DateTime(v) => v.encode(map, "effectiveDateTime"),
            ObservationEffective::Period(v) => {
                map.insert("effectivePeriod".to_string(), v.to_value());
            }
            ObservationEffective::Instant(v) => v.encode(map, "effectiveInstant"),
        }
    }
}

/// All possible types for `value[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObservationValue {
    Quantity(Quantity),
    CodeableConcept(CodeableConcept),
    String(FhirPrimitive<String>),
    Boolean(FhirPrimitive<bool>),
    Integer(FhirPrimitive<i32>),
    Period(Period),
}

impl ObservationValue {
    fn decode(map: &Map<String, Value>) -> Result<Option<Self>> {
        let mut slot = choice::Slot::default();
        if let Some(v) = decode_field(map, "valueQuantity")? {
            choice::claim(&mut slot, "value", "valueQuantity", ObservationValue::Quantity(v))?;
        }
        if let Some(v) = decode_field(map, "valueCodeableConcept")? {
            choice::claim(
                &mut slot,
                "value",
                "valueCodeableConcept",
                ObservationValue::CodeableConcept(v),
            )?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueString")? {
            choice::claim(&mut slot, "value", "valueString", ObservationValue::String(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueBoolean")? {
            choice::claim(&mut slot, "value", "valueBoolean", ObservationValue::Boolean(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueInteger")? {
            choice::claim(&mut slot, "value", "valueInteger", ObservationValue::Integer(v))?;
        }
        if let Some(v) = decode_field(map, "valuePeriod")? {
            choice::claim(&mut slot, "value", "valuePeriod", ObservationValue::Period(v))?;
        }
        Ok(choice::finish(slot))
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        match self {
            ObservationValue::Quantity(v) => {
                map.insert("valueQuantity".to_string(), v.to_value());
            }
            ObservationValue::CodeableConcept(v) => {
                map.insert("valueCodeableConcept".to_string(), v.to_value());
            }
            ObservationValue::String(v) => v.encode(map, "valueString"),
            ObservationValue::Boolean(v) => v.encode(map, "valueBoolean"),
            ObservationValue::Integer(v) => v.encode(map, "valueInteger"),
            ObservationValue::Period(v) => {
                map.insert("valuePeriod".to_string(), v.to_value());
            }
        }
    }
}

/// Provides a guide for interpreting the value by comparison to a normal or
/// recommended range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObservationReferenceRange {
    pub backbone: BackboneElement,
    pub low: Option<Quantity>,
    pub high: Option<Quantity>,
    pub r#type: Option<CodeableConcept>,
    pub text: Option<FhirPrimitive<String>>,
}

impl WireObject for ObservationReferenceRange {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(ObservationReferenceRange {
            backbone: BackboneElement::decode(map)?,
            low: decode_field(map, "low")?,
            high: decode_field(map, "high")?,
            r#type: decode_field(map, "type")?,
            text: FhirPrimitive::decode(map, "text")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        encode_field(&self.low, map, "low");
        encode_field(&self.high, map, "high");
        encode_field(&self.r#type, map, "type");
        encode_primitive(&self.text, map, "text");
    }
}

impl FhirResource for Observation {
    const RESOURCE_TYPE: &'static str = "Observation";

    fn resource(&self) -> &Resource {
        &self.domain.resource
    }
}

impl WireObject for Observation {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        check_resource_type(map, Self::RESOURCE_TYPE)?;
        Ok(Observation {
            domain: DomainResource::decode(map)?,
            identifier: decode_field_vec(map, "identifier")?,
            status: FhirPrimitive::decode_required(map, "status")?,
            category: decode_field_vec(map, "category")?,
            code: require(decode_field(map, "code")?, "code")?,
            subject: decode_field(map, "subject")?,
            encounter: decode_field(map, "encounter")?,
            effective: ObservationEffective::decode(map)?,
            issued: FhirPrimitive::decode(map, "issued")?,
            value: ObservationValue::decode(map)?,
            data_absent_reason: decode_field(map, "dataAbsentReason")?,
            reference_range: decode_field_vec(map, "referenceRange")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        write_resource_type(map, Self::RESOURCE_TYPE);
        self.domain.encode(map);
        encode_field_vec(&self.identifier, map, "identifier");
        self.status.encode(map, "status");
        encode_field_vec(&self.category, map, "category");
        map.insert("code".to_string(), self.code.to_value());
        encode_field(&self.subject, map, "subject");
        encode_field(&self.encounter, map, "encounter");
        if let Some(effective) = &self.effective {
            effective.encode(map);
        }
        encode_primitive(&self.issued, map, "issued");
        if let Some(value) = &self.value {
            value.encode(map);
        }
        encode_field(&self.data_absent_reason, map, "dataAbsentReason");
        encode_field_vec(&self.reference_range, map, "referenceRange");
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

    fn heart_rate() -> Map<String, Value> {
        obj(json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {
                "coding": [{ "system": "http://loinc.org", "code": "8867-4" }]
            },
            "subject": { "reference": "Patient/pat-1" },
            "effectiveDateTime": "2023-06-01T08:30:00Z",
            "valueQuantity": {
                "value": 72,
                "unit": "beats/minute",
                "system": "http://unitsofmeasure.org",
                "code": "/min"
            },
            "referenceRange": [{ "low": { "value": 60 }, "high": { "value": 100 } }]
        }))
    }

    #[test]
    fn decode_and_round_trip() {
        let map = heart_rate();
        let observation = Observation::decode(&map).unwrap();
        assert_eq!(observation.status.value.as_ref().unwrap().as_str(), "final");
        assert!(matches!(
            observation.value,
            Some(ObservationValue::Quantity(_))
        ));
        assert_eq!(observation.to_map(), map);
    }

    #[test]
    fn status_is_required() {
        let mut map = heart_rate();
        map.remove("status");
        let err = Observation::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "status");
    }

    #[test]
    fn code_is_required() {
        let mut map = heart_rate();
        map.remove("code");
        let err = Observation::decode(&map).unwrap_err();
        assert_eq!(err.path(), "code");
    }

    #[test]
    fn conflicting_value_keys_cite_both() {
        let mut map = heart_rate();
        map.insert("valueString".to_string(), json!("seventy-two"));
        let err = Observation::decode(&map).unwrap_err();
        match err {
            DecodeError::ConflictingChoiceValues { first, second, .. } => {
                assert_eq!(first, "valueQuantity");
                assert_eq!(second, "valueString");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nested_error_paths_are_dotted() {
        let mut map = heart_rate();
        map.insert(
            "referenceRange".to_string(),
            json!([{ "low": { "value": "sixty" } }]),
        );
        let err = Observation::decode(&map).unwrap_err();
        assert_eq!(err.path(), "referenceRange[0].low.value");
    }
}
