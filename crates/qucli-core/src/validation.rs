//! Validation error type shared by the path parser and the notification
//! validator.
//!
//! Every usage problem detected before a request is sent is reported as a
//! [`ValidationError`] naming the offending flag or argument.

use std::fmt;

/// A rejected command-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The flag or argument that failed validation (e.g., `level`).
    pub field: String,
    /// A human-readable description of the validation failure.
    pub message: String,
    /// The kind of validation that failed.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use qucli_core::{ValidationError, ValidationErrorKind};
    ///
    /// let error = ValidationError::new(
    ///     "method",
    ///     "unknown method 'pager'",
    ///     ValidationErrorKind::Format,
    /// );
    /// assert_eq!(error.field, "method");
    /// ```
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// Creates an error for a required flag that is missing.
    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Required)
    }

    /// Creates an error for a malformed value.
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Format)
    }

    /// Creates an error for a value outside the allowed range.
    pub fn range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Range)
    }

    /// Creates an error for a flag that may not be combined with another.
    pub fn conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Conflict)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The category of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required flag or argument was not provided.
    Required,
    /// The value format is invalid.
    Format,
    /// The value is outside the allowed range.
    Range,
    /// The flag is not allowed together with another flag value.
    Conflict,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Format => write!(f, "format"),
            Self::Range => write!(f, "range"),
            Self::Conflict => write!(f, "conflict"),
        }
    }
}
