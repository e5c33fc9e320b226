//! The shared metadata layer carried by every embedded value type.
//!
//! `Element` is the sidecar every primitive and complex type composes:
//! an optional id plus an ordered extension list. `BackboneElement` adds
//! modifier extensions for structural (backbone) types. Composite types
//! embed these as their first field, so derived equality and hashing chain
//! base-first, matching the wire decode order.

use serde_json::{Map, Value};

use osmium_wire::{
    choice, decode_field, decode_field_vec, decode_string, encode_field_vec, require, Base64Binary,
    Canonical, Code, Date, DateTime, Decimal, Id, Instant, Markdown, Oid, PositiveInt, Result,
    Sidecar, Time, UnsignedInt, Uri, Url, Uuid, WireObject,
};

use crate::datatypes::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Period, Quantity,
    Reference,
};

/// A primitive field whose sidecar is the model layer's [`Element`].
pub type FhirPrimitive<T> = osmium_wire::FhirPrimitive<T, Element>;

/// Base metadata composed by every embedded type: element id plus an ordered
/// extension list. Extensions are order-sensitive for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Element {
    pub id: Option<String>,
    pub extension: Option<Vec<Extension>>,
}

impl WireObject for Element {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Element {
            id: decode_string(map, "id")?,
            extension: decode_field_vec(map, "extension")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        if let Some(id) = &self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        encode_field_vec(&self.extension, map, "extension");
    }
}

impl Sidecar for Element {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.as_ref().map_or(true, |e| e.is_empty())
    }
}

impl Element {
    pub fn with_id(id: impl Into<String>) -> Self {
        Element {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_extensions(extension: Vec<Extension>) -> Self {
        Element {
            id: None,
            extension: Some(extension),
        }
    }
}

/// Base metadata for backbone (structural) types: [`Element`] plus modifier
/// extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BackboneElement {
    pub element: Element,
    pub modifier_extension: Option<Vec<Extension>>,
}

impl WireObject for BackboneElement {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(BackboneElement {
            element: Element::decode(map)?,
            modifier_extension: decode_field_vec(map, "modifierExtension")?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        encode_field_vec(&self.modifier_extension, map, "modifierExtension");
    }
}

/// A (url, typed value) pair attaching out-of-model data to any
/// metadata-bearing node. The url is a bare string on the wire and never
/// carries its own sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    pub element: Element,
    pub url: String,
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Extension {
            element: Element::default(),
            url: url.into(),
            value: None,
        }
    }

    pub fn with_value(url: impl Into<String>, value: ExtensionValue) -> Self {
        Extension {
            element: Element::default(),
            url: url.into(),
            value: Some(value),
        }
    }
}

impl WireObject for Extension {
    fn decode(map: &Map<String, Value>) -> Result<Self> {
        Ok(Extension {
            element: Element::decode(map)?,
            url: require(decode_string(map, "url")?, "url")?,
            value: ExtensionValue::decode(map)?,
        })
    }

    fn encode(&self, map: &mut Map<String, Value>) {
        self.element.encode(map);
        map.insert("url".to_string(), Value::String(self.url.clone()));
        if let Some(value) = &self.value {
            value.encode(map);
        }
    }
}

/// The closed choice of types an extension value may take, one wire key pair
/// per variant (`valueBoolean`, `valueCoding`, ...), scanned in declared
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionValue {
    Base64Binary(FhirPrimitive<Base64Binary>),
    Boolean(FhirPrimitive<bool>),
    Canonical(FhirPrimitive<Canonical>),
    Code(FhirPrimitive<Code>),
    Date(FhirPrimitive<Date>),
    DateTime(FhirPrimitive<DateTime>),
    Decimal(FhirPrimitive<Decimal>),
    Id(FhirPrimitive<Id>),
    Instant(FhirPrimitive<Instant>),
    Integer(FhirPrimitive<i32>),
    Markdown(FhirPrimitive<Markdown>),
    Oid(FhirPrimitive<Oid>),
    PositiveInt(FhirPrimitive<PositiveInt>),
    String(FhirPrimitive<String>),
    Time(FhirPrimitive<Time>),
    UnsignedInt(FhirPrimitive<UnsignedInt>),
    Uri(FhirPrimitive<Uri>),
    Url(FhirPrimitive<Url>),
    Uuid(FhirPrimitive<Uuid>),
    Address(Address),
    CodeableConcept(CodeableConcept),
    Coding(Coding),
    ContactPoint(ContactPoint),
    HumanName(HumanName),
    Identifier(Identifier),
    Period(Period),
    Quantity(Quantity),
    Reference(Reference),
}

impl ExtensionValue {
    pub(crate) fn decode(map: &Map<String, Value>) -> Result<Option<Self>> {
        use ExtensionValue::*;
        let mut slot = choice::Slot::default();
        if let Some(v) = FhirPrimitive::decode(map, "valueBase64Binary")? {
            choice::claim(&mut slot, "value", "valueBase64Binary", Base64Binary(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueBoolean")? {
            choice::claim(&mut slot, "value", "valueBoolean", Boolean(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueCanonical")? {
            choice::claim(&mut slot, "value", "valueCanonical", Canonical(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueCode")? {
            choice::claim(&mut slot, "value", "valueCode", Code(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueDate")? {
            choice::claim(&mut slot, "value", "valueDate", Date(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueDateTime")? {
            choice::claim(&mut slot, "value", "valueDateTime", DateTime(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueDecimal")? {
            choice::claim(&mut slot, "value", "valueDecimal", Decimal(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueId")? {
            choice::claim(&mut slot, "value", "valueId", Id(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueInstant")? {
            choice::claim(&mut slot, "value", "valueInstant", Instant(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueInteger")? {
            choice::claim(&mut slot, "value", "valueInteger", Integer(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueMarkdown")? {
            choice::claim(&mut slot, "value", "valueMarkdown", Markdown(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueOid")? {
            choice::claim(&mut slot, "value", "valueOid", Oid(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valuePositiveInt")? {
            choice::claim(&mut slot, "value", "valuePositiveInt", PositiveInt(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueString")? {
            choice::claim(&mut slot, "value", "valueString", String(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueTime")? {
            choice::claim(&mut slot, "value", "valueTime", Time(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueUnsignedInt")? {
            choice::claim(&mut slot, "value", "valueUnsignedInt", UnsignedInt(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueUri")? {
            choice::claim(&mut slot, "value", "valueUri", Uri(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueUrl")? {
            choice::claim(&mut slot, "value", "valueUrl", Url(v))?;
        }
        if let Some(v) = FhirPrimitive::decode(map, "valueUuid")? {
            choice::claim(&mut slot, "value", "valueUuid", Uuid(v))?;
        }
        if let Some(v) = decode_field(map, "valueAddress")? {
            choice::claim(&mut slot, "value", "valueAddress", Address(v))?;
        }
        if let Some(v) = decode_field(map, "valueCodeableConcept")? {
            choice::claim(&mut slot, "value", "valueCodeableConcept", CodeableConcept(v))?;
        }
        if let Some(v) = decode_field(map, "valueCoding")? {
            choice::claim(&mut slot, "value", "valueCoding", Coding(v))?;
        }
        if let Some(v) = decode_field(map, "valueContactPoint")? {
            choice::claim(&mut slot, "value", "valueContactPoint", ContactPoint(v))?;
        }
        if let Some(v) = decode_field(map, "valueHumanName")? {
            choice::claim(&mut slot, "value", "valueHumanName", HumanName(v))?;
        }
        if let Some(v) = decode_field(map, "valueIdentifier")? {
            choice::claim(&mut slot, "value", "valueIdentifier", Identifier(v))?;
        }
        if let Some(v) = decode_field(map, "valuePeriod")? {
            choice::claim(&mut slot, "value", "valuePeriod", Period(v))?;
        }
        if let Some(v) = decode_field(map, "valueQuantity")? {
            choice::claim(&mut slot, "value", "valueQuantity", Quantity(v))?;
        }
        if let Some(v) = decode_field(map, "valueReference")? {
            choice::claim(&mut slot, "value", "valueReference", Reference(v))?;
        }
        Ok(choice::finish(slot))
    }

    pub(crate) fn encode(&self, map: &mut Map<String, Value>) {
        match self {
            ExtensionValue::Base64Binary(v) => v.encode(map, "valueBase64Binary"),
            ExtensionValue::Boolean(v) => v.encode(map, "valueBoolean"),
            ExtensionValue::Canonical(v) => v.encode(map, "valueCanonical"),
            ExtensionValue::Code(v) => v.encode(map, "valueCode"),
            ExtensionValue::Date(v) => v.encode(map, "valueDate"),
            ExtensionValue::DateTime(v) => v.encode(map, "valueDateTime"),
            ExtensionValue::Decimal(v) => v.encode(map, "valueDecimal"),
            ExtensionValue::Id(v) => v.encode(map, "valueId"),
            ExtensionValue::Instant(v) => v.encode(map, "valueInstant"),
            ExtensionValue::Integer(v) => v.encode(map, "valueInteger"),
            ExtensionValue::Markdown(v) => v.encode(map, "valueMarkdown"),
            ExtensionValue::Oid(v) => v.encode(map, "valueOid"),
            ExtensionValue::PositiveInt(v) => v.encode(map, "valuePositiveInt"),
            ExtensionValue::String(v) => v.encode(map, "valueString"),
            ExtensionValue::Time(v) => v.encode(map, "valueTime"),
            ExtensionValue::UnsignedInt(v) => v.encode(map, "valueUnsignedInt"),
            ExtensionValue::Uri(v) => v.encode(map, "valueUri"),
            ExtensionValue::Url(v) => v.encode(map, "valueUrl"),
            ExtensionValue::Uuid(v) => v.encode(map, "valueUuid"),
            ExtensionValue::Address(v) => {
                map.insert("valueAddress".to_string(), v.to_value());
            }
            ExtensionValue::CodeableConcept(v) => {
                map.insert("valueCodeableConcept".to_string(), v.to_value());
            }
            ExtensionValue::Coding(v) => {
                map.insert("valueCoding".to_string(), v.to_value());
            }
            ExtensionValue::ContactPoint(v) => {
                map.insert("valueContactPoint".to_string(), v.to_value());
            }
            ExtensionValue::HumanName(v) => {
                map.insert("valueHumanName".to_string(), v.to_value());
            }
            ExtensionValue::Identifier(v) => {
                map.insert("valueIdentifier".to_string(), v.to_value());
            }
            ExtensionValue::Period(v) => {
                map.insert("valuePeriod".to_string(), v.to_value());
            }
            ExtensionValue::Quantity(v) => {
                map.insert("valueQuantity".to_string(), v.to_value());
            }
            ExtensionValue::Reference(v) => {
                map.insert("valueReference".to_string(), v.to_value());
            }
        }
    }
}
