use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a byte string has the wrong length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        actual: usize,
    },
}
