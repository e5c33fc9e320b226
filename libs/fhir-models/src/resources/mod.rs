//! Concrete resource kinds registered with the polymorphic container.

pub mod bundle;
pub mod observation;
pub mod operation_outcome;
pub mod patient;

pub use bundle::*;
pub use observation::*;
pub use operation_outcome::*;
pub use patient::*;
