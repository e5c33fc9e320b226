//! Decode errors for the FHIR JSON wire protocol.
//!
//! Every variant carries the dotted key path to the point of failure
//! (`name[1].family`, `contained[0].birthDate`, ...). Decoding is fail-fast:
//! the first error aborts the enclosing object and no partial graph is
//! returned. Encoding of a well-formed graph cannot fail and is infallible
//! by signature.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("missing required value at `{path}`")]
    MissingRequiredValue { path: String },

    #[error("conflicting values for choice field `{path}`: `{first}` and `{second}` are both populated")]
    ConflictingChoiceValues {
        path: String,
        first: String,
        second: String,
    },

    #[error("malformed {type_name} at `{path}`: {detail}")]
    MalformedPrimitiveFormat {
        path: String,
        type_name: &'static str,
        detail: String,
    },

    #[error("array length mismatch at `{path}`: {values} values vs {elements} sidecar elements")]
    ArrayLengthMismatch {
        path: String,
        values: usize,
        elements: usize,
    },

    #[error("unknown resource type `{name}` at `{path}`")]
    UnknownDiscriminator { path: String, name: String },

    #[error("unexpected JSON type at `{path}`: expected {expected}")]
    UnexpectedJsonType {
        path: String,
        expected: &'static str,
    },
}

impl DecodeError {
    pub fn missing(path: impl Into<String>) -> Self {
        DecodeError::MissingRequiredValue { path: path.into() }
    }

    pub fn unexpected(path: impl Into<String>, expected: &'static str) -> Self {
        DecodeError::UnexpectedJsonType {
            path: path.into(),
            expected,
        }
    }

    /// The dotted key path to the failure, relative to the object whose
    /// decode was invoked.
    pub fn path(&self) -> &str {
        match self {
            DecodeError::MissingRequiredValue { path }
            | DecodeError::ConflictingChoiceValues { path, .. }
            | DecodeError::MalformedPrimitiveFormat { path, .. }
            | DecodeError::ArrayLengthMismatch { path, .. }
            | DecodeError::UnknownDiscriminator { path, .. }
            | DecodeError::UnexpectedJsonType { path, .. } => path,
        }
    }

    /// Prefix the key path with the owning field, for errors bubbling out of
    /// a nested object (`family` inside `name` becomes `name.family`).
    pub fn nested(self, key: &str) -> Self {
        self.map_path(|p| {
            if p.is_empty() {
                key.to_string()
            } else {
                format!("{key}.{p}")
            }
        })
    }

    /// Like [`nested`](Self::nested), for an element of a repeated field.
    pub fn nested_at(self, key: &str, index: usize) -> Self {
        self.map_path(|p| {
            if p.is_empty() {
                format!("{key}[{index}]")
            } else {
                format!("{key}[{index}].{p}")
            }
        })
    }

    fn map_path(mut self, f: impl FnOnce(&str) -> String) -> Self {
        let path = match &mut self {
            DecodeError::MissingRequiredValue { path }
            | DecodeError::ConflictingChoiceValues { path, .. }
            | DecodeError::MalformedPrimitiveFormat { path, .. }
            | DecodeError::ArrayLengthMismatch { path, .. }
            | DecodeError::UnknownDiscriminator { path, .. }
            | DecodeError::UnexpectedJsonType { path, .. } => path,
        };
        *path = f(path);
        self
    }
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_builds_dotted_paths() {
        let err = DecodeError::missing("family").nested("name").nested("contact");
        assert_eq!(err.path(), "contact.name.family");
    }

    #[test]
    fn nested_at_builds_indexed_paths() {
        let err = DecodeError::unexpected("given", "array").nested_at("name", 1);
        assert_eq!(err.path(), "name[1].given");
    }

    #[test]
    fn nested_at_on_empty_path_is_just_the_index() {
        let err = DecodeError::missing("").nested_at("issue", 0);
        assert_eq!(err.path(), "issue[0]");
    }
}
