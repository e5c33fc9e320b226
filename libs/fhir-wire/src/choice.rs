//! "One of N types" choice fields.
//!
//! A choice field `prop[x]` over variants `TypeA, TypeB, ...` is realized as
//! independent wire key pairs `propTypeA`, `propTypeB`, ... scanned in their
//! declared order. At most one candidate may be populated; in memory the
//! field is a Rust enum, so exactly-one-present is a construction-time
//! guarantee and only the decode-time scan can observe a conflict.

use crate::error::{DecodeError, Result};

/// Accumulator for one choice-field scan: the claimed candidate key plus the
/// decoded variant.
pub type Slot<T> = Option<(&'static str, T)>;

/// Record a populated candidate. A second populated candidate for the same
/// field fails with `ConflictingChoiceValues` citing both keys.
pub fn claim<T>(slot: &mut Slot<T>, field: &'static str, key: &'static str, value: T) -> Result<()> {
    if let Some((first, _)) = slot {
        return Err(DecodeError::ConflictingChoiceValues {
            path: field.to_string(),
            first: (*first).to_string(),
            second: key.to_string(),
        });
    }
    *slot = Some((key, value));
    Ok(())
}

/// Finish an optional choice-field scan.
pub fn finish<T>(slot: Slot<T>) -> Option<T> {
    slot.map(|(_, value)| value)
}

/// Finish a mandatory choice-field scan; an empty slot is
/// `MissingRequiredValue` on the field's base name.
pub fn finish_required<T>(slot: Slot<T>, field: &'static str) -> Result<T> {
    finish(slot).ok_or_else(|| DecodeError::missing(field))
}
