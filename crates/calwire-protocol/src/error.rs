//! Protocol error types.

use calwire_core::CalendarError;
use serde_json::Value;
use thiserror::Error;

/// Result type for wire encoding and decoding.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while converting between wire JSON and domain values.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Decode input is not a JSON object (or JSON text of one).
    #[error("cannot decode {entity} from {found}: expected an object, JSON text or {entity}")]
    Shape { entity: &'static str, found: String },

    /// JSON text failed to parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required wire field is absent.
    #[error("{entity}: missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A wire field is present with the wrong JSON type.
    #[error("{entity}: field '{field}' must be {expected}, got {found}")]
    InvalidField {
        entity: &'static str,
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A domain constructor rejected the decoded or encoded values.
    #[error(transparent)]
    Domain(#[from] CalendarError),

    /// A serializer declaration is malformed.
    #[error("serializer {serializer} is malformed: {reason}")]
    Conformance {
        serializer: &'static str,
        reason: String,
    },
}

impl ProtocolError {
    pub(crate) fn shape(entity: &'static str, found: &Value) -> Self {
        Self::Shape {
            entity,
            found: json_kind(found).to_string(),
        }
    }

    pub(crate) fn invalid_field(
        entity: &'static str,
        field: impl Into<String>,
        expected: &'static str,
        found: &Value,
    ) -> Self {
        Self::InvalidField {
            entity,
            field: field.into(),
            expected,
            found: json_kind(found).to_string(),
        }
    }

    /// Returns true for wrong-container-type failures.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }

    /// The domain error, if a domain rule was violated.
    pub fn as_domain(&self) -> Option<&CalendarError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
