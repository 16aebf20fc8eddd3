//! Error types for domain construction and value normalization.

use thiserror::Error;

/// Result type for calendar domain operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Errors raised while building or normalizing calendar values.
///
/// Every constructor either returns a fully valid value or one of these;
/// nothing is partially built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A value is out of range, or a cardinality or exclusivity rule is violated.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Values of incompatible kinds were combined.
    #[error("type mismatch for {field}: {reason}")]
    Type { field: String, reason: String },

    /// The zone name is not present in the IANA database.
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// The wall-clock time does not exist in the zone (DST gap).
    #[error("local time {time} does not exist in {zone}")]
    NonexistentLocalTime { time: String, zone: String },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CalendarError {
    /// Creates a validation error for `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a type error for `field`.
    pub fn type_mismatch(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Type {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the field this error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::Type { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Returns true for range, cardinality and exclusivity failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true for kind mismatches.
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type { .. })
    }
}
