//! # Error Types
//!
//! Domain-specific error types for patrak-core.
//!
//! ## Where Errors Exist (and Where They Don't)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Surface                                   │
//! │                                                                         │
//! │  Formatting & calculation (numerals, amount, invoice)                   │
//! │  └── NO errors. Malformed input degrades to 0 / blank / sentinel.       │
//! │                                                                         │
//! │  Operator input checks (validation)                                     │
//! │  └── ValidationError  - field-level failures                            │
//! │                                                                         │
//! │  Record handling (record)                                               │
//! │  └── CoreError        - record/report failures                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LipiError / CLI                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core errors raised outside the never-fail formatting paths.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An invoice has nothing billable on it.
    ///
    /// ## When This Occurs
    /// - Every screening row and line item is blank
    /// - Raised only by callers that insist on a billable invoice
    ///   (e.g. before persisting); display paths render blanks instead
    #[error("Invoice {invoice_number} has no billable rows")]
    NothingBillable { invoice_number: String },

    /// Record could not be serialized for persistence.
    #[error("Failed to build invoice record: {0}")]
    Record(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Record(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for operator-entered invoice fields.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. invoice number with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NothingBillable {
            invoice_number: "INV-7".to_string(),
        };
        assert_eq!(err.to_string(), "Invoice INV-7 has no billable rows");

        let err = ValidationError::OutOfRange {
            field: "paise".to_string(),
            min: 0,
            max: 99,
        };
        assert_eq!(err.to_string(), "paise must be between 0 and 99");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "client_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
