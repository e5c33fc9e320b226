//! Demographics and administrative information about a person receiving
//! care.

use serde_json::{Map, Value};

use osmium_wire::{
    choice, decode_field, decode_field_vec, encode_field, encode_field_vec, encode_primitive,
    Code, Date, DateTime, Result, WireObject,
};

use crate::datatypes::{Address, CodeableConcept, ContactPoint, HumanName, Identifier, Reference};
use crate::element::FhirPrimitive;
use crate::resource::{check_resource_type, write_resource_type, DomainResource, FhirResource, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Patient {
    pub domain: DomainResource,
    pub identifier: Option<Vec<Identifier>>,
    pub active: Option<FhirPrimitive<bool>>,
    pub name: Option<Vec<HumanName>>,
    pub telecom: Option<Vec<ContactPoint>>,
    /// Administrative gender code.
    pub gender: Option<FhirPrimitive<Code>>,
    pub birth_date: Option<FhirPrimitive<Date>>,
    /// One of `deceased[x]`.
    pub deceased: Option<PatientDeceased>,
    pub address: Option<Vec<Address>>,
    pub marital_status: Option<CodeableConcept>,
    /// One of `multipleBirth[x]`.
    pub multiple_birth: Option<PatientMultipleBirth>,
    pub managing_organization: Option<Reference>,
}

/// All possible types for `deceased[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatientDeceased {
    Boolean(FhirPrimitive<bool>),
    DateTime(FhirPrimitive<DateTime>),
}

impl PatientDeceased {
    fn decode(map: &Map<String, Value>) -> Result<Option<Self>> {
        let mut slot = choice::Slot::default();
        if let Some(v) = FhirPrimitive::decode(map, "deceasedBoolean")? {
            choice::claim(&mut slot, "deceased", "deceasedBoolean", PatientDeceased::Boolean(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "deceasedDateTime")? {
            choice::claim(&mut slot, "deceased", "deceasedDateTime", PatientDeceased::DateTime(v))?;
        }
        Ok(choice::finish(slot))
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        match self {
            PatientDeceased::Boolean(v) => v.encode(map, "deceasedBoolean"),
            PatientDeceased::DateTime(v) => v.encode(map, "deceasedDateTime"),
        }
    }
}

/// All possible types for `multipleBirth[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatientMultipleBirth {
    Boolean(FhirPrimitive<bool>),
    Integer(FhirPrimitive<i32>),
}

impl PatientMultipleBirth {
    fn decode(map: &Map<String, Value>) -> Result<Option<Self>> {
        let mut slot = choice::Slot::default();
        if let Some(v) = FhirPrimitive::decode(map, "multipleBirthBoolean")? {
            choice::claim(
                &mut slot,
                "multipleBirth",
                "multipleBirthBoolean",
                PatientMultipleBirth::Boolean(v),
            )?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "multipleBirthInteger")? {
            choice::claim(
                &mut slot,
                "multipleBirth",
                "multipleBirthInteger",
                PatientMultipleBirth::Integer(v),
            )?;
        }
        Ok(choice::finish(slot))
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        match self {
            PatientMultipleBirth::Boolean(v) => v.encode(map, "multipleBirthBoolean"),
            PatientMultipleBirth::Integer(v) => v.encode(map, "multipleBirthInteger"),
        }
    }
}

impl FhirResource for Patient {
    const RESOURCE_TYPE: &'static str = "Patient";

    fn resource(&self) -> &Resource {
        &self.domain.resource
    }
}

impl WireObject for Patient {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        check_resource_type(map, Self::RESOURCE_TYPE)?;
        Ok(Patient {
            domain: DomainResource::decode(map)?,
            identifier: decode_field_vec(map, "identifier")?,
            active: FhirPrimitive::decode(map, "active")?,
            name: decode_field_vec(map, "name")?,
            telecom: decode_field_vec(map, "telecom")?,
            gender: FhirPrimitive::decode(map, "gender")?,
            birth_date: FhirPrimitive::decode(map, "birthDate")?,
            deceased: PatientDeceased::decode(map)?,
            address: decode_field_vec(map, "address")?,
            marital_status: decode_field(map, "maritalStatus")?,
            multiple_birth: PatientMultipleBirth::decode(map)?,
            managing_organization: decode_field(map, "managingOrganization")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        write_resource_type(map, Self::RESOURCE_TYPE);
        self.domain.encode(map);
        encode_field_vec(&self.identifier, map, "identifier");
        encode_primitive(&self.active, map, "active");
        encode_field_vec(&self.name, map, "name");
        encode_field_vec(&self.telecom, map, "telecom");
        encode_primitive(&self.gender, map, "gender");
        encode_primitive(&self.birth_date, map, "birthDate");
        if let Some(deceased) = &self.deceased {
            deceased.encode(map);
        }
        encode_field_vec(&self.address, map, "address");
        encode_field(&self.marital_status, map, "maritalStatus");
        if let Some(multiple_birth) = &self.multiple_birth {
            multiple_birth.encode(map);
        }
        encode_field(&self.managing_organization, map, "managingOrganization");
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
    fn decode_minimal_patient() {
        let map = obj(json!({ "resourceType": "Patient", "id": "pat-1" }));
        let patient = Patient::decode(&map).unwrap();
        assert_eq!(patient.id().unwrap().as_str(), "pat-1");
    }

    #[test]
    fn deceased_choice_round_trip() {
        let map = obj(json!({
            "resourceType": "Patient",
            "deceasedDateTime": "2021-03-04T10:00:00Z"
        }));
        let patient = Patient::decode(&map).unwrap();
        assert!(matches!(
            patient.deceased,
            Some(PatientDeceased::DateTime(_))
        ));
        assert_eq!(patient.to_map(), map);
    }

    #[test]
    fn conflicting_deceased_keys_fail() {
        let map = obj(json!({
            "resourceType": "Patient",
            "deceasedBoolean": false,
            "deceasedDateTime": "2021-03-04T10:00:00Z"
        }));
        let err = Patient::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::ConflictingChoiceValues { .. }));
    }

    #[test]
    fn malformed_birth_date_cites_field() {
        let map = obj(json!({ "resourceType": "Patient", "birthDate": "31-12-1999" }));
        let err = Patient::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPrimitiveFormat { .. }));
        assert_eq!(err.path(), "birthDate");
    }

    #[test]
    fn wrong_resource_type_is_rejected() {
        let map = obj(json!({ "resourceType": "Observation" }));
        assert!(Patient::decode(&map).is_err());
    }
}
