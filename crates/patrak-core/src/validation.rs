//! # Validation Module
//!
//! Checks on operator-entered invoice fields.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Entry form / importer                                                  │
//! │  └── Half-typed values are normal; calculations degrade to blanks       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Before preparing or storing an invoice                                 │
//! │  └── THIS MODULE: required fields, lengths, ranges                      │
//! │                                                                         │
//! │  The calculation model never calls into this module.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use patrak_core::validation::{validate_invoice_number, validate_paise};
//!
//! validate_invoice_number("PT-2024-031").unwrap();
//! validate_paise(50).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::Invoice;
use crate::{MAX_INVOICE_NUMBER_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an invoice number.
///
/// ## Rules
/// - Must not be empty
/// - At most 30 characters
/// - Letters, digits (either script), `-` and `/` only
///
/// ## Example
/// ```rust
/// use patrak_core::validation::validate_invoice_number;
///
/// assert!(validate_invoice_number("PT-2024-031").is_ok());
/// assert!(validate_invoice_number("पत्र/१२").is_ok());
/// assert!(validate_invoice_number("").is_err());
/// assert!(validate_invoice_number("PT 31").is_err());
/// ```
pub fn validate_invoice_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "invoice_number".to_string(),
        });
    }

    if number.chars().count() > MAX_INVOICE_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "invoice_number".to_string(),
            max: MAX_INVOICE_NUMBER_LEN,
        });
    }

    // Devanagari vowel signs and virama are not alphanumeric in Unicode
    if !number
        .chars()
        .all(|c| c.is_alphanumeric() || crate::numerals::is_devanagari(c) || c == '-' || c == '/')
    {
        return Err(ValidationError::InvalidFormat {
            field: "invoice_number".to_string(),
            reason: "must contain only letters, digits, '-' and '/'".to_string(),
        });
    }

    Ok(())
}

/// Validates a client (cinema) name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_name("client_name", name)
}

fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the paise field of an expense (0–99).
pub fn validate_paise(paise: i64) -> ValidationResult<()> {
    if !(0..=99).contains(&paise) {
        return Err(ValidationError::OutOfRange {
            field: "paise".to_string(),
            min: 0,
            max: 99,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - GST slabs are 0-2800 (0% to 28%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Invoice Validator
// =============================================================================

/// Validates the header fields and tax settings of an invoice.
///
/// Rows are not checked: blank and half-typed rows are legal and simply
/// contribute nothing.
pub fn validate_invoice(invoice: &Invoice) -> ValidationResult<()> {
    validate_invoice_number(&invoice.number)?;
    validate_client_name(&invoice.client_name)?;

    for (field, value) in [("place", &invoice.place), ("film_title", &invoice.film_title)] {
        if value.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_NAME_LEN,
            });
        }
    }

    if let Some(tax) = &invoice.tax {
        validate_tax_rate_bps(tax.rate.bps())?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaxConfig, TaxMode, TaxRate};
    use chrono::NaiveDate;

    fn invoice() -> Invoice {
        Invoice {
            number: "PT-2024-031".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            client_name: "Bhaskar Talkies".to_string(),
            place: "Pune".to_string(),
            film_title: String::new(),
            period: String::new(),
            screenings: vec![],
            line_items: vec![],
            expenses: vec![],
            tax: None,
        }
    }

    #[test]
    fn test_validate_invoice_number() {
        assert!(validate_invoice_number("PT-2024-031").is_ok());
        assert!(validate_invoice_number("12/2024").is_ok());
        assert!(validate_invoice_number("पत्र/१२").is_ok());

        assert!(validate_invoice_number("").is_err());
        assert!(validate_invoice_number("   ").is_err());
        assert!(validate_invoice_number("PT 31").is_err());
        assert!(validate_invoice_number(&"A".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Bhaskar Talkies").is_ok());
        assert!(validate_client_name("भास्कर टॉकीज").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_paise() {
        assert!(validate_paise(0).is_ok());
        assert!(validate_paise(99).is_ok());
        assert!(validate_paise(100).is_err());
        assert!(validate_paise(-1).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_invoice() {
        assert!(validate_invoice(&invoice()).is_ok());

        let mut bad = invoice();
        bad.client_name = " ".to_string();
        assert!(matches!(
            validate_invoice(&bad),
            Err(ValidationError::Required { .. })
        ));

        let mut bad = invoice();
        bad.tax = Some(TaxConfig {
            rate: TaxRate::from_bps(12_000),
            mode: TaxMode::Igst,
        });
        assert!(matches!(
            validate_invoice(&bad),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut bad = invoice();
        bad.film_title = "F".repeat(250);
        assert!(matches!(
            validate_invoice(&bad),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
