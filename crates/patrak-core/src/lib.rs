//! # patrak-core: Pure Billing Logic for Patrak
//!
//! This crate holds the numeric and invoice logic of Patrak as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Patrak Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front ends (browser form, patrak-cli)              │   │
//! │  │    Entry ──► Import ──► Preview ──► PDF ──► Store ──► Report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           patrak-lipi (transliteration + display)               │   │
//! │  │    dictionary, phonetic rules, external backend, InvoiceDisplay │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ patrak-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ numerals │ │  amount  │ │ invoice  │ │  record  │          │   │
//! │  │   │ ० ↔ 0    │ │ १२,३४५   │ │ totals   │ │ JSON map │          │   │
//! │  │   │ parse    │ │ words    │ │ GST      │ │ reports  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`numerals`] - ASCII ↔ Devanagari digits, tolerant number parsing
//! - [`money`] - Money type in integer paise
//! - [`amount`] - Indian grouping, blank-aware display, amount in words
//! - [`invoice`] - Row totals, sales/expenses/net, GST breakdown
//! - [`record`] - Persistence record and per-client reports
//! - [`types`] - Domain types (Invoice, rows, tax settings)
//! - [`validation`] - Operator input checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Never fail on display paths**: malformed numbers become `0`, blanks stay blank
//! 2. **Blank is not zero**: "not filled in" is `None`, never a sentinel number
//! 3. **Integer Money**: amounts are summed in paise (i64)
//! 4. **Typed Errors**: only validation and record building return errors
//!
//! ## Example Usage
//!
//! ```rust
//! use patrak_core::amount::{amount_to_words, format_amount};
//! use patrak_core::numerals::parse_number;
//!
//! let value = parse_number("१२,३४५.५०");
//! assert_eq!(format_amount(Some(value), 2), "१२,३४५.५०");
//! assert_eq!(
//!     amount_to_words(value),
//!     "Twelve Thousand Three Hundred and Forty Five Rupees and Fifty Paise only"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod error;
pub mod invoice;
pub mod money;
pub mod numerals;
pub mod record;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use patrak_core::Money` instead of
// `use patrak_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{Billable, InvoiceSummary, InvoiceTotals, NetBalance, TaxBreakdown};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest whole-rupee magnitude the words expansion spells out.
///
/// ## Business Reason
/// Ninety Nine Crore and up never appears on a distribution invoice; larger
/// values are almost always a typing slip and print "Amount too large".
pub const AMOUNT_WORDS_CEILING: u64 = 999_999_999;

/// Maximum length of an invoice number.
pub const MAX_INVOICE_NUMBER_LEN: usize = 30;

/// Maximum length of client, place and film names.
pub const MAX_NAME_LEN: usize = 200;
