//! # Domain Types
//!
//! Value types that describe an invoice. None of them carry identity; an
//! invoice is recomputed from these every time it is displayed.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Invoice                                      │
//! │   number, date, client, place, film, period                             │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐       │
//! │  │  CollectionRow   │  │ InvoiceLineItem  │  │  ExpenseEntry    │       │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │       │
//! │  │  date            │  │  date            │  │  label           │       │
//! │  │  shows           │  │  quantity        │  │  amount (Money)  │       │
//! │  │  audience        │  │  unit_price      │  │                  │       │
//! │  │  collection      │  │                  │  │                  │       │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘       │
//! │     (spreadsheet)         (direct entry)        (rupee + paise)         │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐                             │
//! │  │    TaxRate       │  │    TaxMode       │                             │
//! │  │  bps (u32)       │  │  Igst            │                             │
//! │  │  1800 = 18%      │  │  CgstSgst        │                             │
//! │  └──────────────────┘  └──────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::numerals::parse_number;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18% GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a user-typed percentage.
    ///
    /// Negative or non-finite percentages become zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// Which GST regime applies to the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Inter-state: the whole rate as a single IGST line.
    Igst,
    /// Intra-state: the rate split in two equal CGST and SGST lines.
    CgstSgst,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::CgstSgst
    }
}

/// Tax settings entered for one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxConfig {
    pub rate: TaxRate,
    #[serde(default)]
    pub mode: TaxMode,
}

// =============================================================================
// Billed Rows
// =============================================================================

/// One directly entered row: quantity × per-unit price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceLineItem {
    /// Date as typed by the operator (any script).
    pub date: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
}

/// One screening row: shows, audience and the collection billed for them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionRow {
    pub date: String,
    #[serde(default)]
    pub shows: f64,
    #[serde(default)]
    pub audience: f64,
    #[serde(default)]
    pub collection: f64,
}

/// One expense line, entered as separate rupee and paise fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseEntry {
    pub label: String,
    pub amount: Money,
}

impl ExpenseEntry {
    /// Builds an entry from the raw rupee / paise text fields of the form.
    ///
    /// Unparseable fields count as zero; fractional rupees are truncated
    /// because the paise field holds the fraction.
    pub fn from_fields(label: impl Into<String>, rupees: &str, paise: &str) -> Self {
        let rupees = parse_number(rupees).trunc() as i64;
        let paise = (parse_number(paise).trunc() as i64).clamp(0, 99);
        ExpenseEntry {
            label: label.into(),
            amount: Money::from_rupees_paise(rupees, paise),
        }
    }
}

// =============================================================================
// Spreadsheet Import
// =============================================================================

/// A spreadsheet cell that should hold a number.
///
/// Spreadsheet readers hand over either real numbers or the text the
/// operator typed (often with Devanagari digits or `,` separators).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum SheetCell {
    Number(f64),
    Text(String),
}

impl SheetCell {
    /// Numeric value of the cell; unparseable text is zero.
    pub fn value(&self) -> f64 {
        match self {
            SheetCell::Number(n) if n.is_finite() => *n,
            SheetCell::Number(_) => 0.0,
            SheetCell::Text(s) => parse_number(s),
        }
    }

    /// Display text of the cell.
    pub fn text(&self) -> String {
        match self {
            SheetCell::Number(n) => n.to_string(),
            SheetCell::Text(s) => s.clone(),
        }
    }
}

/// A row exactly as the spreadsheet importer produces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportedRow {
    #[serde(default)]
    pub date: Option<SheetCell>,
    #[serde(default)]
    pub show: Option<SheetCell>,
    #[serde(default)]
    pub aud: Option<SheetCell>,
    #[serde(default)]
    pub collection: Option<SheetCell>,
}

impl ImportedRow {
    /// Converts the raw row into a screening row.
    pub fn to_collection_row(&self) -> CollectionRow {
        let num = |cell: &Option<SheetCell>| cell.as_ref().map(SheetCell::value).unwrap_or(0.0);
        CollectionRow {
            date: self.date.as_ref().map(SheetCell::text).unwrap_or_default(),
            shows: num(&self.show),
            audience: num(&self.aud),
            collection: num(&self.collection),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A complete invoice as entered or imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub number: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Cinema / client name, usually typed in Latin script.
    pub client_name: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub film_title: String,
    /// Free-text billing period, e.g. "01/03/2024 - 07/03/2024".
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub screenings: Vec<CollectionRow>,
    #[serde(default)]
    pub line_items: Vec<InvoiceLineItem>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub tax: Option<TaxConfig>,
}

// =============================================================================
// Unit Tests
// =============================================================================
