//! # Invoice Display Preparation
//!
//! Turns an [`Invoice`] into the finished strings the PDF layer lays out.
//! The renderer gets plain text only and never calls back into the core.
//!
//! ## Field Treatment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  client / place / film / expense labels   transliterated (Marathi)     │
//! │  invoice number / period / row dates      digits → Devanagari          │
//! │  row amounts, sales                       blank when there is none     │
//! │  expenses                                 always shown, ०.०० for zero   │
//! │  net balance                              absolute amount + sign flag   │
//! │  tax lines                                one per GST share             │
//! │  amount in words                          English, empty when blank     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use patrak_core::amount::{format_amount, format_money};
use patrak_core::invoice::{Billable, InvoiceSummary, TaxBreakdown};
use patrak_core::numerals::to_devanagari_digits;
use patrak_core::types::{CollectionRow, Invoice, InvoiceLineItem, TaxMode};

use crate::engine::{Confidence, TransliterationResult, Transliterator};

/// Date layout printed on invoices, before digit conversion.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// =============================================================================
// Display Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScreeningLine {
    pub date: String,
    pub shows: String,
    pub audience: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemLine {
    pub date: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseLine {
    pub label: String,
    pub amount: String,
}

/// One GST share, e.g. `CGST ९%  ९०.००`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxLine {
    pub label: String,
    pub rate: String,
    pub amount: String,
}

/// Every string an invoice page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDisplay {
    pub number: String,
    pub date: String,
    pub client_name: String,
    pub place: String,
    pub film_title: String,
    pub period: String,
    pub screenings: Vec<ScreeningLine>,
    pub line_items: Vec<ItemLine>,
    pub expenses: Vec<ExpenseLine>,
    pub total_sales: String,
    pub total_expenses: String,
    pub net_balance: String,
    pub net_is_negative: bool,
    pub tax_lines: Vec<TaxLine>,
    pub net_payable: String,
    pub amount_in_words: String,
    /// Weakest confidence among the transliterated fields.
    pub confidence: Confidence,
}

// =============================================================================
// Field Formatting
// =============================================================================

pub fn format_date(date: NaiveDate) -> String {
    to_devanagari_digits(&date.format(DATE_FORMAT).to_string())
}

/// Whole counts without decimals, fractional counts with two.
fn format_count(value: f64) -> String {
    let decimals = if value.fract() == 0.0 { 0 } else { 2 };
    format_amount(Some(value), decimals)
}

/// Percentage without trailing zeros: `९`, `२.५`, `९.१२५`.
fn format_rate(percentage: f64) -> String {
    format!("{}%", to_devanagari_digits(&percentage.to_string()))
}

fn screening_line(row: &CollectionRow) -> ScreeningLine {
    ScreeningLine {
        date: to_devanagari_digits(&row.date),
        shows: format_count(row.shows),
        audience: format_count(row.audience),
        amount: format_money(row.total()),
    }
}

fn item_line(row: &InvoiceLineItem) -> ItemLine {
    ItemLine {
        date: to_devanagari_digits(&row.date),
        quantity: format_count(row.quantity),
        unit_price: format_amount(Some(row.unit_price), 2),
        amount: format_money(row.total()),
    }
}

fn tax_lines(tax: &TaxBreakdown) -> Vec<TaxLine> {
    let full = tax.rate.percentage();
    let line = |label: &str, rate: f64, amount| TaxLine {
        label: label.to_string(),
        rate: format_rate(rate),
        amount: format_money(Some(amount)),
    };

    match tax.mode {
        TaxMode::Igst => tax.igst.map(|m| line("IGST", full, m)).into_iter().collect(),
        TaxMode::CgstSgst => [("CGST", tax.cgst), ("SGST", tax.sgst)]
            .into_iter()
            .filter_map(|(label, amount)| amount.map(|m| line(label, full / 2.0, m)))
            .collect(),
    }
}

/// Transliterated text fields, in the order the invoice prints them.
struct Names {
    client_name: TransliterationResult,
    place: TransliterationResult,
    film_title: TransliterationResult,
    expense_labels: Vec<TransliterationResult>,
}

impl Names {
    fn confidence(&self) -> Confidence {
        [&self.client_name, &self.place, &self.film_title]
            .into_iter()
            .chain(self.expense_labels.iter())
            .map(|r| r.confidence)
            .min()
            .unwrap_or(Confidence::Native)
    }
}

// =============================================================================
// Preparation
// =============================================================================

impl InvoiceDisplay {
    /// Prepares the display, consulting the transliteration backend when it
    /// is available.
    pub async fn prepare(invoice: &Invoice, transliterator: &Transliterator) -> Self {
        let labels = join_all(
            invoice
                .expenses
                .iter()
                .map(|e| transliterator.transliterate_text(&e.label)),
        );
        let (client_name, place, film_title, expense_labels) = tokio::join!(
            transliterator.transliterate_text(&invoice.client_name),
            transliterator.transliterate_text(&invoice.place),
            transliterator.transliterate_text(&invoice.film_title),
            labels,
        );

        let names = Names {
            client_name,
            place,
            film_title,
            expense_labels,
        };
        Self::assemble(invoice, names)
    }

    /// Prepares the display with local transliteration only.
    pub fn prepare_local(invoice: &Invoice, transliterator: &Transliterator) -> Self {
        let names = Names {
            client_name: transliterator.transliterate_text_local(&invoice.client_name),
            place: transliterator.transliterate_text_local(&invoice.place),
            film_title: transliterator.transliterate_text_local(&invoice.film_title),
            expense_labels: invoice
                .expenses
                .iter()
                .map(|e| transliterator.transliterate_text_local(&e.label))
                .collect(),
        };
        Self::assemble(invoice, names)
    }

    fn assemble(invoice: &Invoice, names: Names) -> Self {
        let InvoiceSummary {
            totals,
            tax,
            net_payable,
            amount_in_words,
        } = invoice.summary();
        let confidence = names.confidence();

        debug!(
            invoice_number = %invoice.number,
            rows = invoice.screenings.len() + invoice.line_items.len(),
            confidence = ?confidence,
            "Prepared invoice display"
        );

        let expenses = invoice
            .expenses
            .iter()
            .zip(names.expense_labels)
            .map(|(e, label)| ExpenseLine {
                label: label.text,
                amount: format_money(Some(e.amount)),
            })
            .collect();

        InvoiceDisplay {
            number: to_devanagari_digits(&invoice.number),
            date: format_date(invoice.date),
            client_name: names.client_name.text,
            place: names.place.text,
            film_title: names.film_title.text,
            period: to_devanagari_digits(&invoice.period),
            screenings: invoice.screenings.iter().map(screening_line).collect(),
            line_items: invoice.line_items.iter().map(item_line).collect(),
            expenses,
            total_sales: format_money(totals.total_sales),
            total_expenses: format_money(Some(totals.total_expenses)),
            net_balance: format_money(totals.net_balance.map(|n| n.amount)),
            net_is_negative: totals.net_balance.is_some_and(|n| n.is_negative),
            tax_lines: tax.as_ref().map(tax_lines).unwrap_or_default(),
            net_payable: format_money(net_payable),
            amount_in_words,
            confidence,
        }
    }
}
