//! # Amount Formatter
//!
//! Renders amounts the way the printed invoice shows them: Indian digit
//! grouping with Devanagari numerals, and the English "amount in words" line.
//!
//! ## Indian Grouping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   1234567.89                                                            │
//! │        │                                                                │
//! │        ▼   last three digits, then pairs                                │
//! │   12,34,567.89                                                          │
//! │        │                                                                │
//! │        ▼   digit mapper                                                 │
//! │   १२,३४,५६७.८९                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Blank Zero
//! A zero or missing amount renders as an empty string on the invoice, not
//! `0.00`. This is a business rule of the printed form.

use crate::money::Money;
use crate::numerals::to_devanagari_digits;
use crate::AMOUNT_WORDS_CEILING;

/// Returned by the words expansion above the supported magnitude.
pub const AMOUNT_TOO_LARGE: &str = "Amount too large";

// =============================================================================
// Digit Grouping
// =============================================================================

/// Inserts Indian-style separators into a run of ASCII digits.
///
/// ## Example
/// ```rust
/// use patrak_core::amount::group_indian;
///
/// assert_eq!(group_indian("1234567"), "12,34,567");
/// assert_eq!(group_indian("999"), "999");
/// assert_eq!(group_indian("100000"), "1,00,000");
/// ```
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last3) = digits.split_at(digits.len() - 3);

    let mut pairs: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        pairs.push(&head[start..end]);
        end = start;
    }
    pairs.reverse();

    format!("{},{}", pairs.join(","), last3)
}

/// Formats a decimal value with Indian grouping, ASCII digits.
fn format_grouped(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;
    let fixed = format!("{:.*}", decimals, rounded);

    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let sign = if value < 0.0 && rounded != 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, group_indian(int_part), f),
        None => format!("{}{}", sign, group_indian(int_part)),
    }
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Formats an amount for an invoice cell.
///
/// `None`, zero and non-finite values render blank.
///
/// ## Example
/// ```rust
/// use patrak_core::amount::format_amount;
///
/// assert_eq!(format_amount(Some(1234567.891), 2), "१२,३४,५६७.८९");
/// assert_eq!(format_amount(Some(0.0), 2), "");
/// assert_eq!(format_amount(None, 2), "");
/// ```
pub fn format_amount(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => to_devanagari_digits(&format_grouped(v, decimals)),
        _ => String::new(),
    }
}

/// Formats a paise amount for an invoice cell.
///
/// Only `None` is blank here: a `Money` that exists is shown even when it is
/// zero (expenses are never blank).
///
/// ## Example
/// ```rust
/// use patrak_core::amount::format_money;
/// use patrak_core::money::Money;
///
/// assert_eq!(format_money(Some(Money::from_paise(123_456_789))), "१२,३४,५६७.८९");
/// assert_eq!(format_money(Some(Money::zero())), "०.००");
/// assert_eq!(format_money(None), "");
/// ```
pub fn format_money(amount: Option<Money>) -> String {
    let Some(m) = amount else {
        return String::new();
    };
    let sign = if m.is_negative() { "-" } else { "" };
    let text = format!(
        "{}{}.{:02}",
        sign,
        group_indian(&m.rupees().abs().to_string()),
        m.paise_part()
    );
    to_devanagari_digits(&text)
}

// =============================================================================
// Amount in Words
// =============================================================================

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const HUNDRED: u64 = 100;
const THOUSAND: u64 = 1_000;
const LAKH: u64 = 1_00_000;
const CRORE: u64 = 1_00_00_000;

/// Spells a whole number on the Indian scale.
///
/// Must not be called with zero except at the top level; zero is only ever
/// spoken as a whole amount.
fn spell(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{} {}", tens, ONES[unit as usize]),
            }
        }
        100..=999 => {
            let head = format!("{} Hundred", ONES[(n / HUNDRED) as usize]);
            match n % HUNDRED {
                0 => head,
                rest => format!("{} and {}", head, spell(rest)),
            }
        }
        _ => {
            let (unit, name) = if n >= CRORE {
                (CRORE, "Crore")
            } else if n >= LAKH {
                (LAKH, "Lakh")
            } else {
                (THOUSAND, "Thousand")
            };
            let head = format!("{} {}", spell(n / unit), name);
            match n % unit {
                0 => head,
                rest => format!("{} {}", head, spell(rest)),
            }
        }
    }
}

/// Splits an absolute rupee value into whole rupees and paise.
///
/// Paise are `round(fraction × 100)`; a fraction that rounds to 100 carries
/// into the rupees.
fn split_rupees(abs_value: f64) -> (u64, u64) {
    let rupees = abs_value.floor();
    let paise = ((abs_value - rupees) * 100.0).round() as u64;
    if paise >= 100 {
        (rupees as u64 + 1, paise - 100)
    } else {
        (rupees as u64, paise)
    }
}

fn words_for(negative: bool, rupees: u64, paise: u64) -> String {
    let mut out = String::new();
    if negative && (rupees > 0 || paise > 0) {
        out.push_str("Minus ");
    }
    out.push_str(&spell(rupees));
    out.push_str(" Rupees");
    if paise > 0 {
        out.push_str(" and ");
        out.push_str(&spell(paise));
        out.push_str(" Paise");
    }
    out.push_str(" only");
    out
}

/// Spells an amount in English words, rupees and paise.
///
/// Returns [`AMOUNT_TOO_LARGE`] when the magnitude exceeds
/// [`AMOUNT_WORDS_CEILING`]; non-finite input is treated as zero.
///
/// ## Example
/// ```rust
/// use patrak_core::amount::amount_to_words;
///
/// assert_eq!(
///     amount_to_words(1234.50),
///     "One Thousand Two Hundred and Thirty Four Rupees and Fifty Paise only"
/// );
/// assert_eq!(amount_to_words(0.0), "Zero Rupees only");
/// assert_eq!(amount_to_words(1_000_000_000.0), "Amount too large");
/// ```
pub fn amount_to_words(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let abs = value.abs();
    if abs > AMOUNT_WORDS_CEILING as f64 {
        return AMOUNT_TOO_LARGE.to_string();
    }

    let (rupees, paise) = split_rupees(abs);
    if rupees > AMOUNT_WORDS_CEILING {
        return AMOUNT_TOO_LARGE.to_string();
    }
    words_for(value < 0.0, rupees, paise)
}

/// Spells a paise amount in English words.
pub fn money_to_words(amount: Money) -> String {
    let abs = amount.paise().unsigned_abs();
    let (rupees, paise) = (abs / 100, abs % 100);
    if rupees > AMOUNT_WORDS_CEILING {
        return AMOUNT_TOO_LARGE.to_string();
    }
    words_for(amount.is_negative(), rupees, paise)
}

// =============================================================================
// Unit Tests
// =============================================================================
