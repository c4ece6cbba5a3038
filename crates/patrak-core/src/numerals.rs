//! # Numerals Module
//!
//! Bidirectional mapping between ASCII digits and Devanagari numeral glyphs,
//! plus a numeric parser that accepts either script.
//!
//! ## Mapping Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   0  1  2  3  4  5  6  7  8  9      ASCII  (U+0030 – U+0039)           │
//! │   ०  १  २  ३  ४  ५  ६  ७  ८  ९      Devanagari (U+0966 – U+096F)       │
//! │                                                                         │
//! │  Every other character passes through untouched, so mixed strings like  │
//! │  "Show 3 / शो ४" convert digit by digit.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Never Fail
//! Callers are display and calculation paths where a blank or half-typed
//! field is a normal interim state. `parse_number` therefore returns `0.0`
//! instead of an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// First code point of the Devanagari block.
pub const DEVANAGARI_START: u32 = 0x0900;

/// Last code point of the Devanagari block.
pub const DEVANAGARI_END: u32 = 0x097F;

const DEVANAGARI_ZERO: u32 = 0x0966;

// =============================================================================
// Script Classification
// =============================================================================

/// The script a numeral is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NumeralScript {
    /// ASCII '0'..='9'.
    Latin,
    /// Devanagari '०'..='९'.
    Devanagari,
}

impl NumeralScript {
    /// Classifies a single character, `None` if it is not a digit.
    pub fn of(c: char) -> Option<Self> {
        if c.is_ascii_digit() {
            Some(NumeralScript::Latin)
        } else if devanagari_digit_value(c).is_some() {
            Some(NumeralScript::Devanagari)
        } else {
            None
        }
    }

    /// Script of the first digit found in `text`.
    ///
    /// Mixed strings are legal; this only reports which script leads.
    pub fn detect(text: &str) -> Option<Self> {
        text.chars().find_map(NumeralScript::of)
    }
}

/// Returns true if any Devanagari digit glyph occurs in `text`.
pub fn contains_devanagari_digits(text: &str) -> bool {
    text.chars().any(|c| devanagari_digit_value(c).is_some())
}

/// Returns true if `c` lies in the Devanagari block (U+0900–U+097F).
#[inline]
pub fn is_devanagari(c: char) -> bool {
    (DEVANAGARI_START..=DEVANAGARI_END).contains(&(c as u32))
}

/// Counts Devanagari code points in `text`.
pub fn count_devanagari(text: &str) -> usize {
    text.chars().filter(|c| is_devanagari(*c)).count()
}

#[inline]
fn devanagari_digit_value(c: char) -> Option<u32> {
    let cp = c as u32;
    if (DEVANAGARI_ZERO..=DEVANAGARI_ZERO + 9).contains(&cp) {
        Some(cp - DEVANAGARI_ZERO)
    } else {
        None
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Replaces every Devanagari digit with its ASCII equivalent.
///
/// ## Example
/// ```rust
/// use patrak_core::numerals::to_latin_digits;
///
/// assert_eq!(to_latin_digits("१२,३४५.६७"), "12,345.67");
/// assert_eq!(to_latin_digits("शो ३"), "शो 3");
/// ```
pub fn to_latin_digits(text: &str) -> String {
    text.chars()
        .map(|c| match devanagari_digit_value(c) {
            Some(d) => char::from_digit(d, 10).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Replaces every ASCII digit with its Devanagari glyph.
///
/// ## Example
/// ```rust
/// use patrak_core::numerals::to_devanagari_digits;
///
/// assert_eq!(to_devanagari_digits("12,34,567.89"), "१२,३४,५६७.८९");
/// ```
pub fn to_devanagari_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(DEVANAGARI_ZERO + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a number written in either script, treating anything unparseable
/// as zero.
///
/// Steps: digits → ASCII, trim, drop `,` separators, parse as `f64`.
/// Non-finite results (`inf`, `NaN`) also become zero.
///
/// ## Example
/// ```rust
/// use patrak_core::numerals::parse_number;
///
/// assert_eq!(parse_number("१२,३४५.६७"), 12345.67);
/// assert_eq!(parse_number("abc"), 0.0);
/// assert_eq!(parse_number(""), 0.0);
/// ```
pub fn parse_number(text: &str) -> f64 {
    let normalized: String = to_latin_digits(text)
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
