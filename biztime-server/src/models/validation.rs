//! Validation error types

use std::fmt;

/// Validation error for request payloads and path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field was not supplied
    Missing { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Value doesn't have the required shape (e.g., integer id)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value is outside what the column can hold
    OutOfRange { field: &'static str, max: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::OutOfRange { field, max } => {
                write!(f, "{} must be between -{} and {}", field, max, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Unwrap an optional request field, reporting it as missing.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}
