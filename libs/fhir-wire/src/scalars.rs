//! FHIR primitive scalar kinds and their lexical grammars.
//!
//! Each kind knows its wire type name, how to parse itself out of a bare JSON
//! value, and how to render itself back. Grammar checks run at decode time;
//! a value of the right JSON type that violates the grammar is rejected with
//! the offending text. Date/time kinds stay as validated strings so partial
//! dates (`1905`, `1905-08`) round-trip losslessly.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub use rust_decimal::Decimal;

/// Why a bare JSON value failed to parse as a primitive.
///
/// `WrongType` becomes `UnexpectedJsonType` and `Invalid` becomes
/// `MalformedPrimitiveFormat` once the codec knows the field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The JSON value has the wrong type entirely (e.g. a number where a
    /// string is required). Carries the expected JSON type name.
    WrongType(&'static str),
    /// The host representation is fine but the lexical grammar or value
    /// range is violated. Carries a human-readable detail.
    Invalid(String),
}

/// A scalar kind usable as the value half of a primitive field.
pub trait Primitive: Clone + fmt::Debug + PartialEq + Eq + std::hash::Hash {
    /// The FHIR type name, used in diagnostics (`date`, `unsignedInt`, ...).
    const TYPE_NAME: &'static str;

    fn parse(value: &Value) -> Result<Self, ParseError>;
    fn to_json(&self) -> Value;
}

impl Primitive for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn parse(value: &Value) -> Result<Self, ParseError> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => Err(ParseError::WrongType("boolean")),
        }
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Primitive for String {
    const TYPE_NAME: &'static str = "string";

    fn parse(value: &Value) -> Result<Self, ParseError> {
        match value {
            Value::String(s) if s.is_empty() => {
                Err(ParseError::Invalid("string must not be empty".into()))
            }
            Value::String(s) => Ok(s.clone()),
            _ => Err(ParseError::WrongType("string")),
        }
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

fn parse_i64(value: &Value) -> Result<i64, ParseError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ParseError::Invalid(format!("`{n}` is not a whole number"))),
        _ => Err(ParseError::WrongType("number")),
    }
}

impl Primitive for i32 {
    const TYPE_NAME: &'static str = "integer";

    fn parse(value: &Value) -> Result<Self, ParseError> {
        let n = parse_i64(value)?;
        i32::try_from(n).map_err(|_| ParseError::Invalid(format!("`{n}` exceeds 32-bit range")))
    }

    fn to_json(&self) -> Value {
        Value::Number((*self).into())
    }
}

/// 32-bit integer, zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnsignedInt(i32);

impl UnsignedInt {
    pub fn new(value: i32) -> Result<Self, ParseError> {
        if value < 0 {
            return Err(ParseError::Invalid(format!("`{value}` is negative")));
        }
        Ok(UnsignedInt(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Primitive for UnsignedInt {
    const TYPE_NAME: &'static str = "unsignedInt";

    fn parse(value: &Value) -> Result<Self, ParseError> {
        UnsignedInt::new(i32::parse(value)?)
    }

    fn to_json(&self) -> Value {
        Value::Number(self.0.into())
    }
}

/// 32-bit integer, one or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositiveInt(i32);

impl PositiveInt {
    pub fn new(value: i32) -> Result<Self, ParseError> {
        if value < 1 {
            return Err(ParseError::Invalid(format!("`{value}` is not positive")));
        }
        Ok(PositiveInt(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Primitive for PositiveInt {
    const TYPE_NAME: &'static str = "positiveInt";

    fn parse(value: &Value) -> Result<Self, ParseError> {
        PositiveInt::new(i32::parse(value)?)
    }

    fn to_json(&self) -> Value {
        Value::Number(self.0.into())
    }
}

impl Primitive for Decimal {
    const TYPE_NAME: &'static str = "decimal";

    fn parse(value: &Value) -> Result<Self, ParseError> {
        match value {
            Value::Number(n) => n
                .to_string()
                .parse()
                .map_err(|_| ParseError::Invalid(format!("`{n}` is not a valid decimal"))),
            _ => Err(ParseError::WrongType("number")),
        }
    }

    fn to_json(&self) -> Value {
        let rendered = self.to_string();
        let number = rendered
            .parse::<serde_json::Number>()
            .expect("decimal renders as a valid JSON number");
        Value::Number(number)
    }
}

/// Defines a string-backed scalar kind validated by an anchored regex.
macro_rules! lexical_string {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $pattern:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ParseError> {
                static GRAMMAR: Lazy<Regex> =
                    Lazy::new(|| Regex::new($pattern).expect("grammar regex must compile"));
                let value = value.into();
                if GRAMMAR.is_match(&value) {
                    Ok(Self(value))
                } else {
                    Err(ParseError::Invalid(format!(
                        "`{value}` does not match the {} grammar",
                        $type_name
                    )))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Primitive for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn parse(value: &Value) -> Result<Self, ParseError> {
                match value {
                    Value::String(s) => Self::new(s.as_str()),
                    _ => Err(ParseError::WrongType("string")),
                }
            }

            fn to_json(&self) -> Value {
                Value::String(self.0.clone())
            }
        }
    };
}

lexical_string!(
    /// Token of non-whitespace words separated by single spaces.
    Code, "code", r"^[^\s]+(\s[^\s]+)*$"
);

lexical_string!(
    /// Logical id: letters, digits, `-` and `.`, at most 64 characters.
    Id, "id", r"^[A-Za-z0-9\-\.]{1,64}$"
);

lexical_string!(
    /// Markdown-formatted free text (structurally a non-empty string).
    Markdown, "markdown", r"^[\s\S]+$"
);

lexical_string!(
    /// URI; whitespace is the only structural exclusion.
    Uri, "uri", r"^\S*$"
);

lexical_string!(
    /// URL; same lexical space as `uri`, distinct wire type name.
    Url, "url", r"^\S*$"
);

lexical_string!(
    /// Canonical reference, optionally versioned with `|`.
    Canonical, "canonical", r"^\S*$"
);

lexical_string!(
    /// OID in URN form.
    Oid, "oid", r"^urn:oid:[0-2](\.(0|[1-9][0-9]*))+$"
);

lexical_string!(
    /// UUID in URN form, lowercase hex.
    Uuid, "uuid", r"^urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
);

lexical_string!(
    /// Standard base64 with padding.
    Base64Binary, "base64Binary",
    r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$"
);

lexical_string!(
    /// Date with year, year-month, or full precision.
    Date, "date",
    r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$"
);

lexical_string!(
    /// Date, optionally extended to a full timestamp; if a time is present a
    /// timezone offset is mandatory.
    DateTime, "dateTime",
    r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$"
);

lexical_string!(
    /// Full-precision timestamp with mandatory timezone.
    Instant, "instant",
    r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))$"
);

lexical_string!(
    /// Time of day, no timezone.
    Time, "time", r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?$"
);
