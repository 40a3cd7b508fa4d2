use crate::descriptor::PrimitiveKind;

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MappingError>;

#[derive(Debug, Error)]
pub enum MappingError {
    /// A descriptor points at something that was never registered
    /// (a projection field, a namespace prefix, a selector).
    #[error("type `{type_name}` references an unregistered target: {reason}")]
    UnknownType {
        type_name: &'static str,
        reason: String,
    },

    #[error("expected a {expected} value, found {found}")]
    Coercion {
        expected: PrimitiveKind,
        found: String,
    },

    #[error("cannot build `{type_name}` from {found} (no primitive projection is configured)")]
    IncompatibleShape {
        type_name: &'static str,
        found: String,
    },

    #[error("malformed input for `{type_name}`: expected {expected}, found {found}")]
    MalformedInput {
        type_name: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("nesting depth exceeds the configured maximum of {max_depth}")]
    DepthLimitExceeded { max_depth: usize },

    #[error("required field `{wire_key}` of `{type_name}` is not set")]
    MissingRequiredField {
        type_name: &'static str,
        wire_key: &'static str,
    },

    #[error("failed to read XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("`serde_json` failed with error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MappingError {
    pub(crate) fn coercion(expected: PrimitiveKind, found: impl Into<String>) -> Self {
        MappingError::Coercion {
            expected,
            found: found.into(),
        }
    }

    /// True for the errors that are recorded against a single field instead of
    /// aborting the whole call.
    pub fn is_field_level(&self) -> bool {
        matches!(
            self,
            MappingError::Coercion { .. }
                | MappingError::IncompatibleShape { .. }
                | MappingError::DepthLimitExceeded { .. }
                | MappingError::MissingRequiredField { .. }
        )
    }
}

/// A non-fatal anomaly, anchored at the wire path where it happened.
#[derive(Debug)]
pub struct FieldIssue {
    pub path: String,
    pub error: MappingError,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}
