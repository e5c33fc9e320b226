//! General-purpose complex datatypes embedded inside resources.
//!
//! Every type composes [`Element`] as its first field and decodes it before
//! its own fields, so the shared metadata occupies a fixed position in both
//! the wire protocol and the derived equality/hash chain.

use serde_json::{Map, Value};

use osmium_wire::{
    decode_field, decode_field_vec, encode_field, encode_field_vec, encode_primitive, Canonical,
    Code, DateTime, Decimal, Id, Instant, Result, Uri, WireObject,
};

use crate::element::{Element, FhirPrimitive};

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Coding {
    pub element: Element,
    pub system: Option<FhirPrimitive<Uri>>,
    pub version: Option<FhirPrimitive<String>>,
    pub code: Option<FhirPrimitive<Code>>,
    pub display: Option<FhirPrimitive<String>>,
    pub user_selected: Option<FhirPrimitive<bool>>,
}

impl WireObject for Coding {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Coding {
            element: Element::decode(map)?,
            system: FhirPrimitive::decode(map, "system")?,
            version: FhirPrimitive::decode(map, "version")?,
            code: FhirPrimitive::decode(map, "code")?,
            display: FhirPrimitive::decode(map, "display")?,
            user_selected: FhirPrimitive::decode(map, "userSelected")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.system, map, "system");
        encode_primitive(&self.version, map, "version");
        encode_primitive(&self.code, map, "code");
        encode_primitive(&self.display, map, "display");
        encode_primitive(&self.user_selected, map, "userSelected");
    }
}

/// A concept, possibly coded in one or more terminologies, with an optional
/// free-text rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CodeableConcept {
    pub element: Element,
    pub coding: Option<Vec<Coding>>,
    pub text: Option<FhirPrimitive<String>>,
}

impl WireObject for CodeableConcept {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(CodeableConcept {
            element: Element::decode(map)?,
            coding: decode_field_vec(map, "coding")?,
            text: FhirPrimitive::decode(map, "text")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_field_vec(&self.coding, map, "coding");
        encode_primitive(&self.text, map, "text");
    }
}

/// A measured amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Quantity {
    pub element: Element,
    pub value: Option<FhirPrimitive<Decimal>>,
    pub comparator: Option<FhirPrimitive<Code>>,
    pub unit: Option<FhirPrimitive<String>>,
    pub system: Option<FhirPrimitive<Uri>>,
    pub code: Option<FhirPrimitive<Code>>,
}

impl WireObject for Quantity {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Quantity {
            element: Element::decode(map)?,
            value: FhirPrimitive::decode(map, "value")?,
            comparator: FhirPrimitive::decode(map, "comparator")?,
            unit: FhirPrimitive::decode(map, "unit")?,
            system: FhirPrimitive::decode(map, "system")?,
            code: FhirPrimitive::decode(map, "code")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.value, map, "value");
        encode_primitive(&self.comparator, map, "comparator");
        encode_primitive(&self.unit, map, "unit");
        encode_primitive(&self.system, map, "system");
        encode_primitive(&self.code, map, "code");
    }
}

/// A time range bounded by two dateTimes; either bound may be open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Period {
    pub element: Element,
    pub start: Option<FhirPrimitive<DateTime>>,
    pub end: Option<FhirPrimitive<DateTime>>,
}

impl WireObject for Period {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Period {
            element: Element::decode(map)?,
            start: FhirPrimitive::decode(map, "start")?,
            end: FhirPrimitive::decode(map, "end")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.start, map, "start");
        encode_primitive(&self.end, map, "end");
    }
}

/// A reference from one resource to another, literal or logical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Reference {
    pub element: Element,
    pub reference: Option<FhirPrimitive<String>>,
    pub r#type: Option<FhirPrimitive<Uri>>,
    pub identifier: Option<Box<Identifier>>,
    pub display: Option<FhirPrimitive<String>>,
}

impl Reference {
    /// A literal reference such as `Patient/pat-1`.
    pub fn literal(reference: impl Into<String>) -> Self {
        Reference {
            reference: Some(FhirPrimitive::new(reference.into())),
            ..Default::default()
        }
    }
}

impl WireObject for Reference {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Reference {
            element: Element::decode(map)?,
            reference: FhirPrimitive::decode(map, "reference")?,
            r#type: FhirPrimitive::decode(map, "type")?,
            identifier: decode_field(map, "identifier")?,
            display: FhirPrimitive::decode(map, "display")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.reference, map, "reference");
        encode_primitive(&self.r#type, map, "type");
        encode_field(&self.identifier, map, "identifier");
        encode_primitive(&self.display, map, "display");
    }
}

/// A business identifier within some system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Identifier {
    pub element: Element,
    pub r#use: Option<FhirPrimitive<Code>>,
    pub r#type: Option<CodeableConcept>,
    pub system: Option<FhirPrimitive<Uri>>,
    pub value: Option<FhirPrimitive<String>>,
    pub period: Option<Period>,
    pub assigner: Option<Box<Reference>>,
}

impl WireObject for Identifier {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Identifier {
            element: Element::decode(map)?,
            r#use: FhirPrimitive::decode(map, "use")?,
            r#type: decode_field(map, "type")?,
            system: FhirPrimitive::decode(map, "system")?,
            value: FhirPrimitive::decode(map, "value")?,
            period: decode_field(map, "period")?,
            assigner: decode_field(map, "assigner")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.r#use, map, "use");
        encode_field(&self.r#type, map, "type");
        encode_primitive(&self.system, map, "system");
        encode_primitive(&self.value, map, "value");
        encode_field(&self.period, map, "period");
        encode_field(&self.assigner, map, "assigner");
    }
}

/// A human name, split into parts; `given` is a repeated primitive and keeps
/// positional alignment with its sidecar array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HumanName {
    pub element: Element,
    pub r#use: Option<FhirPrimitive<Code>>,
    pub text: Option<FhirPrimitive<String>>,
    pub family: Option<FhirPrimitive<String>>,
    pub given: Option<Vec<FhirPrimitive<String>>>,
    pub prefix: Option<Vec<FhirPrimitive<String>>>,
    pub suffix: Option<Vec<FhirPrimitive<String>>>,
    pub period: Option<Period>,
}

impl WireObject for HumanName {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(HumanName {
            element: Element::decode(map)?,
            r#use: FhirPrimitive::decode(map, "use")?,
            text: FhirPrimitive::decode(map, "text")?,
            family: FhirPrimitive::decode(map, "family")?,
            given: FhirPrimitive::decode_vec(map, "given")?,
            prefix: FhirPrimitive::decode_vec(map, "prefix")?,
            suffix: FhirPrimitive::decode_vec(map, "suffix")?,
            period: decode_field(map, "period")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.r#use, map, "use");
        encode_primitive(&self.text, map, "text");
        encode_primitive(&self.family, map, "family");
        FhirPrimitive::encode_vec_opt(&self.given, map, "given");
        FhirPrimitive::encode_vec_opt(&self.prefix, map, "prefix");
        FhirPrimitive::encode_vec_opt(&self.suffix, map, "suffix");
        encode_field(&self.period, map, "period");
    }
}

/// Contact details (phone, email, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContactPoint {
    pub element: Element,
    pub system: Option<FhirPrimitive<Code>>,
    pub value: Option<FhirPrimitive<String>>,
    pub r#use: Option<FhirPrimitive<Code>>,
    pub rank: Option<FhirPrimitive<osmium_wire::PositiveInt>>,
    pub period: Option<Period>,
}

impl WireObject for ContactPoint {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(ContactPoint {
            element: Element::decode(map)?,
            system: FhirPrimitive::decode(map, "system")?,
            value: FhirPrimitive::decode(map, "value")?,
            r#use: FhirPrimitive::decode(map, "use")?,
            rank: FhirPrimitive::decode(map, "rank")?,
            period: decode_field(map, "period")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.system, map, "system");
        encode_primitive(&self.value, map, "value");
        encode_primitive(&self.r#use, map, "use");
        encode_primitive(&self.rank, map, "rank");
        encode_field(&self.period, map, "period");
    }
}

/// A postal address; `line` is a repeated primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Address {
    pub element: Element,
    pub r#use: Option<FhirPrimitive<Code>>,
    pub r#type: Option<FhirPrimitive<Code>>,
    pub text: Option<FhirPrimitive<String>>,
    pub line: Option<Vec<FhirPrimitive<String>>>,
    pub city: Option<FhirPrimitive<String>>,
    pub district: Option<FhirPrimitive<String>>,
    pub state: Option<FhirPrimitive<String>>,
    pub postal_code: Option<FhirPrimitive<String>>,
    pub country: Option<FhirPrimitive<String>>,
    pub period: Option<Period>,
}

impl WireObject for Address {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Address {
            element: Element::decode(map)?,
            r#use: FhirPrimitive::decode(map, "use")?,
            r#type: FhirPrimitive::decode(map, "type")?,
            text: FhirPrimitive::decode(map, "text")?,
            line: FhirPrimitive::decode_vec(map, "line")?,
            city: FhirPrimitive::decode(map, "city")?,
            district: FhirPrimitive::decode(map, "district")?,
            state: FhirPrimitive::decode(map, "state")?,
            postal_code: FhirPrimitive::decode(map, "postalCode")?,
            country: FhirPrimitive::decode(map, "country")?,
            period: decode_field(map, "period")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.r#use, map, "use");
        encode_primitive(&self.r#type, map, "type");
        encode_primitive(&self.text, map, "text");
        FhirPrimitive::encode_vec_opt(&self.line, map, "line");
        encode_primitive(&self.city, map, "city");
        encode_primitive(&self.district, map, "district");
        encode_primitive(&self.state, map, "state");
        encode_primitive(&self.postal_code, map, "postalCode");
        encode_primitive(&self.country, map, "country");
        encode_field(&self.period, map, "period");
    }
}

/// Versioning and provenance metadata carried by every resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Meta {
    pub element: Element,
    pub version_id: Option<FhirPrimitive<Id>>,
    pub last_updated: Option<FhirPrimitive<Instant>>,
    pub source: Option<FhirPrimitive<Uri>>,
    pub profile: Option<Vec<FhirPrimitive<Canonical>>>,
    pub security: Option<Vec<Coding>>,
    pub tag: Option<Vec<Coding>>,
}

impl WireObject for Meta {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Meta {
            element: Element::decode(map)?,
            version_id: FhirPrimitive::decode(map, "versionId")?,
            last_updated: FhirPrimitive::decode(map, "lastUpdated")?,
            source: FhirPrimitive::decode(map, "source")?,
            profile: FhirPrimitive::decode_vec(map, "profile")?,
            security: decode_field_vec(map, "security")?,
            tag: decode_field_vec(map, "tag")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_primitive(&self.version_id, map, "versionId");
        encode_primitive(&self.last_updated, map, "lastUpdated");
        encode_primitive(&self.source, map, "source");
        FhirPrimitive::encode_vec_opt(&self.profile, map, "profile");
        encode_field_vec(&self.security, map, "security");
        encode_field_vec(&self.tag, map, "tag");
    }
}

/// Human-readable narrative: a generation status plus an XHTML blob. Both
/// parts are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Narrative {
    pub element: Element,
    pub status: FhirPrimitive<Code>,
    pub div: FhirPrimitive<String>,
}

impl Narrative {
    pub fn new(status: FhirPrimitive<Code>, div: FhirPrimitive<String>) -> Self {
        Narrative {
            element: Element::default(),
            status,
            div,
        }
    }
}

impl WireObject for Narrative {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Narrative {
            element: Element::decode(map)?,
            status: FhirPrimitive::decode_required(map, "status")?,
            div: FhirPrimitive::decode_required(map, "div")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        self.status.encode(map, "status");
        self.div.encode(map, "div");
    }
}
