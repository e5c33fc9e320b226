//! FHIR JSON wire protocol core.
//!
//! The generic codec machinery every concrete resource definition relies on:
//!
//! - [`scalars`]: the primitive scalar kinds and their lexical grammars
//! - [`primitive`]: the `f`/`_f` value/metadata merge protocol, including the
//!   index-aligned parallel-array form for repeated fields
//! - [`choice`]: the "exactly one of N types" field protocol
//! - [`object`]: the keyed-container decode/encode trait for complex types
//! - [`error`]: the fail-fast decode error set with dotted key paths
//!
//! The codec is purely functional: decode consumes an immutable
//! `serde_json::Map` and yields a complete value graph or a single terminal
//! error; encode consumes an immutable graph and writes a fresh container.
//! No I/O, no shared state, no partial results.

#![forbid(unsafe_code)]

pub mod choice;
pub mod error;
pub mod object;
pub mod primitive;
pub mod scalars;

pub use error::{DecodeError, Result};
pub use object::{
    decode_field, decode_field_vec, decode_string, encode_field, encode_field_vec, require,
    WireObject,
};
pub use primitive::{encode_primitive, FhirPrimitive, Sidecar};
pub use scalars::{
    Base64Binary, Canonical, Code, Date, DateTime, Decimal, Id, Instant, Markdown, Oid,
    ParseError, PositiveInt, Primitive, Time, UnsignedInt, Uri, Url, Uuid,
};
