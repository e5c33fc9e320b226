//! A collection of error, warning or information messages resulting from a
//! system action.

use serde_json::{Map, Value};

use osmium_wire::{
    decode_field, decode_field_vec, encode_field, encode_primitive, require, Code, Result,
    WireObject,
};

use crate::datatypes::CodeableConcept;
use crate::element::{BackboneElement, FhirPrimitive};
use crate::resource::{check_resource_type, write_resource_type, DomainResource, FhirResource, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationOutcome {
    pub domain: DomainResource,
    /// At least one issue is required.
    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    pub fn new(issue: Vec<OperationOutcomeIssue>) -> Self {
        OperationOutcome {
            domain: DomainResource::default(),
            issue,
        }
    }
}

/// A single issue associated with the action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationOutcomeIssue {
    pub backbone: BackboneElement,
    /// fatal | error | warning | information (required).
    pub severity: FhirPrimitive<Code>,
    /// Error or warning code (required).
    pub code: FhirPrimitive<Code>,
    pub details: Option<CodeableConcept>,
    pub diagnostics: Option<FhirPrimitive<String>>,
    /// FHIRPath expressions naming the offending elements.
    pub expression: Option<Vec<FhirPrimitive<String>>>,
}

impl OperationOutcomeIssue {
    pub fn new(severity: FhirPrimitive<Code>, code: FhirPrimitive<Code>) -> Self {
        OperationOutcomeIssue {
            backbone: BackboneElement::default(),
            severity,
            code,
            details: None,
            diagnostics: None,
            expression: None,
        }
    }
}

impl WireObject for OperationOutcomeIssue {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(OperationOutcomeIssue {
            backbone: BackboneElement::decode(map)?,
            severity: FhirPrimitive::decode_required(map, "severity")?,
            code: FhirPrimitive::decode_required(map, "code")?,
            details: decode_field(map, "details")?,
            diagnostics: FhirPrimitive::decode(map, "diagnostics")?,
            expression: FhirPrimitive::decode_vec(map, "expression")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.backbone.encode(map);
        self.severity.encode(map, "severity");
        self.code.encode(map, "code");
        encode_field(&self.details, map, "details");
        encode_primitive(&self.diagnostics, map, "diagnostics");
        FhirPrimitive::encode_vec_opt(&self.expression, map, "expression");
    }
}

impl FhirResource for OperationOutcome {
    const RESOURCE_TYPE: &'static str = "OperationOutcome";

    fn resource(&self) -> &Resource {
        &self.domain.resource
    }
}

impl WireObject for OperationOutcome {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        check_resource_type(map, Self::RESOURCE_TYPE)?;
        Ok(OperationOutcome {
            domain: DomainResource::decode(map)?,
            issue: require(decode_field_vec(map, "issue")?, "issue")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        write_resource_type(map, Self::RESOURCE_TYPE);
        self.domain.encode(map);
        if !self.issue.is_empty() {
            let issues = self.issue.iter().map(WireObject::to_value).collect();
            map.insert("issue".to_string(), Value::Array(issues));
        }
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
    fn outcome_round_trip() {
        let map = obj(json!({
            "resourceType": "OperationOutcome",
            "issue": [{
                "severity": "error",
                "code": "structure",
                "diagnostics": "unknown element `frobnicate`",
                "expression": ["Patient.frobnicate"]
            }]
        }));
        let outcome = OperationOutcome::decode(&map).unwrap();
        assert_eq!(outcome.issue.len(), 1);
        assert_eq!(
            outcome.issue[0].severity.value.as_ref().unwrap().as_str(),
            "error"
        );
        assert_eq!(outcome.to_map(), map);
    }

    #[test]
    fn issue_is_required() {
        let map = obj(json!({ "resourceType": "OperationOutcome" }));
        let err = OperationOutcome::decode(&map).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredValue { .. }));
        assert_eq!(err.path(), "issue");
    }

    #[test]
    fn issue_severity_is_required() {
        let map = obj(json!({
            "resourceType": "OperationOutcome",
            "issue": [{ "code": "structure" }]
        }));
        let err = OperationOutcome::decode(&map).unwrap_err();
        assert_eq!(err.path(), "issue[0].severity");
    }
}
