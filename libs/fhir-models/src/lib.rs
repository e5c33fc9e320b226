//! FHIR data models
//!
//! Strongly-typed Rust structures for FHIR resources and datatypes, built on
//! the `osmium-wire` codec core.
//!
//! # Module Organization
//!
//! - `element`: the shared metadata layer (Element, BackboneElement,
//!   Extension) every other type composes
//! - `datatypes`: general-purpose complex datatypes (Coding, Quantity, ...)
//! - `resource`: the Resource/DomainResource base composition
//! - `proxy`: the polymorphic resource container and its kind registry
//! - `resources`: concrete resource kinds (Patient, Observation, Bundle,
//!   OperationOutcome)
//!
//! # Design Philosophy
//!
//! - **Composition over inheritance**: base metadata is an embedded first
//!   field, not a superclass; decode, encode, equality and hashing all chain
//!   base-first
//! - **Lossless**: the `f`/`_f` primitive pairing, parallel arrays and
//!   partial dates all round-trip byte-equivalently
//! - **Fail-fast**: decode yields a complete graph or one error with a
//!   dotted key path; no partial instances escape
//! - **Immutable**: values are constructed once; nothing is re-validated on
//!   encode
//!
//! # Example
//!
//! ```rust
//! use osmium_models::{Patient, FhirResource, WireObject};
//! use serde_json::json;
//!
//! let value = json!({
//!     "resourceType": "Patient",
//!     "id": "pat-1",
//!     "birthDate": "1974-12-25",
//!     "_birthDate": { "id": "bd1" }
//! });
//!
//! let patient = Patient::from_value(&value).unwrap();
//! assert_eq!(patient.id().unwrap().as_str(), "pat-1");
//! assert_eq!(patient.to_value(), value);
//! ```

#![forbid(unsafe_code)]

pub mod datatypes;
pub mod element;
pub mod proxy;
pub mod resource;
pub mod resources;

// Re-export commonly used types
pub use datatypes::*;
pub use element::{BackboneElement, Element, Extension, ExtensionValue, FhirPrimitive};
pub use proxy::ResourceProxy;
pub use resource::{DomainResource, FhirResource, Resource};
pub use resources::*;

// The codec core this crate is built on, plus its scalar kinds.
pub use osmium_wire::scalars::*;
pub use osmium_wire::{self as wire, DecodeError, Result, WireObject};
