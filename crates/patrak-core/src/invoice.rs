//! # Invoice Calculation Model
//!
//! Pure derivations from billed rows and expenses to the figures printed on
//! an invoice.
//!
//! ## Derivation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   rows (Billable)              expenses (ExpenseEntry)                  │
//! │        │                              │                                 │
//! │        ▼ row_total                    │                                 │
//! │   Option<Money> per row               │                                 │
//! │        │                              │                                 │
//! │        ▼ total_sales                  ▼ total_expenses                  │
//! │   Option<Money>  (0 → None)       Money  (0 stays 0)                    │
//! │        └──────────────┬───────────────┘                                 │
//! │                       ▼ net_balance                                     │
//! │              Option<NetBalance { amount, is_negative }>                 │
//! │                       │                                                 │
//! │                       ▼ TaxBreakdown::compute (optional)                │
//! │              IGST  or  CGST + SGST, net payable                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Blank vs. Zero
//! A row with nothing typed yet has no total (`None`) and renders blank.
//! Sales follow the same rule when their sum is exactly zero. Expenses do
//! not: an expense column that starts at zero is shown as zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::money_to_words;
use crate::money::Money;
use crate::types::{CollectionRow, ExpenseEntry, Invoice, InvoiceLineItem, TaxMode, TaxRate};

// =============================================================================
// Row Totals
// =============================================================================

/// Total of one row: `quantity × unit_price`, rounded to the paisa.
///
/// Returns `None` when either factor is zero or not a finite number, so the
/// cell stays blank rather than showing `0.00`.
///
/// ## Example
/// ```rust
/// use patrak_core::invoice::row_total;
///
/// assert_eq!(row_total(3.0, 250.5).map(|m| m.paise()), Some(75_150));
/// assert_eq!(row_total(0.0, 250.5), None);
/// ```
pub fn row_total(quantity: f64, unit_price: f64) -> Option<Money> {
    if !quantity.is_finite() || !unit_price.is_finite() || quantity == 0.0 || unit_price == 0.0 {
        return None;
    }
    Some(Money::from_f64(quantity * unit_price))
}

/// A row that contributes to total sales.
pub trait Billable {
    /// Billed amount of the row, `None` while the row is blank.
    fn total(&self) -> Option<Money>;
}

impl Billable for InvoiceLineItem {
    fn total(&self) -> Option<Money> {
        row_total(self.quantity, self.unit_price)
    }
}

/// Screening rows bill the collection figure itself; shows and audience are
/// informational columns.
impl Billable for CollectionRow {
    fn total(&self) -> Option<Money> {
        if !self.collection.is_finite() || self.collection == 0.0 {
            return None;
        }
        Some(Money::from_f64(self.collection))
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Sums row totals, skipping blanks. An exact zero sum is blank.
pub fn sum_row_totals<I>(totals: I) -> Option<Money>
where
    I: IntoIterator<Item = Option<Money>>,
{
    let sum: Money = totals.into_iter().flatten().sum();
    if sum.is_zero() {
        None
    } else {
        Some(sum)
    }
}

/// Total sales over a set of rows.
pub fn total_sales<B: Billable>(rows: &[B]) -> Option<Money> {
    sum_row_totals(rows.iter().map(Billable::total))
}

/// Total expenses, summed in integer paise. Zero is a real zero.
pub fn total_expenses(expenses: &[ExpenseEntry]) -> Money {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sales minus expenses, with the sign carried separately from the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NetBalance {
    /// Absolute value of `sales - expenses`.
    pub amount: Money,
    /// True iff sales < expenses.
    pub is_negative: bool,
}

impl NetBalance {
    /// The balance with its sign restored.
    pub fn signed(&self) -> Money {
        if self.is_negative {
            -self.amount
        } else {
            self.amount
        }
    }
}

/// Net balance; blank while sales are blank.
///
/// ## Example
/// ```rust
/// use patrak_core::invoice::net_balance;
/// use patrak_core::money::Money;
///
/// let net = net_balance(Some(Money::from_paise(10_000)), Money::from_paise(12_000)).unwrap();
/// assert_eq!(net.amount.paise(), 2_000);
/// assert!(net.is_negative);
///
/// assert!(net_balance(None, Money::from_paise(500)).is_none());
/// ```
pub fn net_balance(sales: Option<Money>, expenses: Money) -> Option<NetBalance> {
    let sales = sales?;
    let diff = sales - expenses;
    Some(NetBalance {
        amount: diff.abs(),
        is_negative: sales < expenses,
    })
}

/// The three derived figures of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    pub total_sales: Option<Money>,
    pub total_expenses: Money,
    pub net_balance: Option<NetBalance>,
}

impl InvoiceTotals {
    /// Derives totals for a homogeneous set of rows.
    pub fn compute<B: Billable>(rows: &[B], expenses: &[ExpenseEntry]) -> Self {
        Self::from_sales(total_sales(rows), expenses)
    }

    /// Derives totals from an already summed sales figure.
    pub fn from_sales(total_sales: Option<Money>, expenses: &[ExpenseEntry]) -> Self {
        let total_expenses = total_expenses(expenses);
        InvoiceTotals {
            total_sales,
            total_expenses,
            net_balance: net_balance(total_sales, total_expenses),
        }
    }
}

// =============================================================================
// Tax
// =============================================================================

/// GST lines derived from a taxable base.
///
/// ## Rounding Order
/// ```text
/// base 1000.00 @ 18%, CgstSgst
///   CGST = round(1000.00 × 9%)  =  90.00
///   SGST = round(1000.00 × 9%)  =  90.00
///   net  = 1000.00 + 90.00 + 90.00 = 1180.00
/// ```
/// Each share is rounded to the paisa on its own, then summed. Historical
/// totals depend on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdown {
    pub base: Money,
    pub rate: TaxRate,
    pub mode: TaxMode,
    pub igst: Option<Money>,
    pub cgst: Option<Money>,
    pub sgst: Option<Money>,
    pub total_tax: Money,
    pub net_payable: Money,
}

impl TaxBreakdown {
    /// Applies `rate` to `base` under `mode`.
    ///
    /// ## Example
    /// ```rust
    /// use patrak_core::invoice::TaxBreakdown;
    /// use patrak_core::money::Money;
    /// use patrak_core::types::{TaxMode, TaxRate};
    ///
    /// let t = TaxBreakdown::compute(Money::from_paise(100_000), TaxRate::from_bps(1800), TaxMode::CgstSgst);
    /// assert_eq!(t.cgst.map(|m| m.paise()), Some(9_000));
    /// assert_eq!(t.net_payable.paise(), 118_000);
    /// ```
    pub fn compute(base: Money, rate: TaxRate, mode: TaxMode) -> Self {
        let (igst, cgst, sgst) = match mode {
            TaxMode::Igst => (Some(base.tax_at(rate)), None, None),
            TaxMode::CgstSgst => {
                let half = base.half_tax_at(rate);
                (None, Some(half), Some(half))
            }
        };
        let total_tax: Money = [igst, cgst, sgst].into_iter().flatten().sum();

        TaxBreakdown {
            base,
            rate,
            mode,
            igst,
            cgst,
            sgst,
            total_tax,
            net_payable: base + total_tax,
        }
    }
}

// =============================================================================
// Invoice Summary
// =============================================================================

/// Everything an invoice prints below its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceSummary {
    pub totals: InvoiceTotals,
    /// Present only when a tax rate is configured and the balance is a
    /// non-negative figure.
    pub tax: Option<TaxBreakdown>,
    /// Final amount: taxed net when tax applies, otherwise the signed net
    /// balance. Blank while sales are blank.
    pub net_payable: Option<Money>,
    /// Empty while `net_payable` is blank.
    pub amount_in_words: String,
}

impl Invoice {
    /// Sales over screening rows and direct line items together.
    pub fn total_sales(&self) -> Option<Money> {
        let screenings = self.screenings.iter().map(Billable::total);
        let items = self.line_items.iter().map(Billable::total);
        sum_row_totals(screenings.chain(items))
    }

    /// Sales, expenses and net balance of this invoice.
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::from_sales(self.total_sales(), &self.expenses)
    }

    /// True if at least one row has a billed amount.
    pub fn has_billable_rows(&self) -> bool {
        self.screenings.iter().any(|r| r.total().is_some())
            || self.line_items.iter().any(|r| r.total().is_some())
    }

    /// Derives totals, tax and the amount in words.
    ///
    /// The taxable base is the net balance. A negative balance is a refund
    /// position and is never taxed.
    pub fn summary(&self) -> InvoiceSummary {
        let totals = self.totals();

        let tax = match (self.tax, totals.net_balance) {
            (Some(cfg), Some(net)) if !cfg.rate.is_zero() && !net.is_negative => {
                Some(TaxBreakdown::compute(net.amount, cfg.rate, cfg.mode))
            }
            _ => None,
        };

        let net_payable = match (&tax, totals.net_balance) {
            (Some(t), _) => Some(t.net_payable),
            (None, Some(net)) => Some(net.signed()),
            (None, None) => None,
        };

        InvoiceSummary {
            totals,
            tax,
            net_payable,
            amount_in_words: net_payable.map(money_to_words).unwrap_or_default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxConfig;
    use chrono::NaiveDate;

    fn item(quantity: f64, unit_price: f64) -> InvoiceLineItem {
        InvoiceLineItem {
            date: "01/03/2024".to_string(),
            quantity,
            unit_price,
        }
    }

    fn screening(collection: f64) -> CollectionRow {
        CollectionRow {
            date: "02/03/2024".to_string(),
            shows: 4.0,
            audience: 310.0,
            collection,
        }
    }

    fn expense(paise: i64) -> ExpenseEntry {
        ExpenseEntry {
            label: "Poster".to_string(),
            amount: Money::from_paise(paise),
        }
    }

    fn invoice() -> Invoice {
        Invoice {
            number: "PT-2024-031".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            client_name: "Bhaskar Talkies".to_string(),
            place: "Pune".to_string(),
            film_title: "Sairat".to_string(),
            period: "01/03/2024 - 07/03/2024".to_string(),
            screenings: vec![screening(60_000.0), screening(0.0)],
            line_items: vec![item(2.0, 20_000.0)],
            expenses: vec![expense(0)],
            tax: None,
        }
    }

    #[test]
    fn test_row_total_blank_vs_value() {
        assert_eq!(row_total(0.0, 10.0), None);
        assert_eq!(row_total(5.0, 0.0), None);
        assert_eq!(row_total(f64::NAN, 10.0), None);
        assert_eq!(row_total(2.0, f64::INFINITY), None);
        assert_eq!(row_total(4.0, 312.25).map(|m| m.paise()), Some(124_900));
        assert_eq!(row_total(5.0, 10.0), Some(Money::from_paise(5_000)));
    }

    #[test]
    fn test_total_sales_skips_blank_rows() {
        let rows = vec![item(2.0, 100.0), item(0.0, 50.0), item(1.0, 0.5)];
        assert_eq!(total_sales(&rows).map(|m| m.paise()), Some(20_050));
    }

    #[test]
    fn test_total_sales_zero_is_blank() {
        let rows = vec![item(1.0, 100.0), item(-1.0, 100.0)];
        assert_eq!(total_sales(&rows), None);
        assert_eq!(total_sales::<InvoiceLineItem>(&[]), None);
    }

    #[test]
    fn test_total_expenses_zero_is_zero() {
        assert_eq!(total_expenses(&[]), Money::zero());
        assert_eq!(total_expenses(&[expense(1230), expense(785)]).paise(), 2015);
    }

    #[test]
    fn test_net_balance_sign() {
        let net = net_balance(Some(Money::from_paise(50_000)), Money::from_paise(20_000)).unwrap();
        assert_eq!(net.amount.paise(), 30_000);
        assert!(!net.is_negative);

        let net = net_balance(Some(Money::from_paise(10_000)), Money::from_paise(12_000)).unwrap();
        assert_eq!(net.amount.paise(), 2_000);
        assert!(net.is_negative);
        assert_eq!(net.signed().paise(), -2_000);

        let net = net_balance(Some(Money::from_paise(5_000)), Money::from_paise(7_000)).unwrap();
        assert_eq!(net.amount, Money::from_paise(2_000));
        assert!(net.is_negative);

        let even = net_balance(Some(Money::from_paise(500)), Money::from_paise(500)).unwrap();
        assert!(even.amount.is_zero());
        assert!(!even.is_negative);
    }

    #[test]
    fn test_huge_totals_saturate() {
        let rows = vec![screening(5e16), screening(5e16)];
        let sales = total_sales(&rows);
        assert_eq!(sales, Some(Money::from_paise(i64::MAX)));
        assert_eq!(money_to_words(Money::from_paise(i64::MAX)), "Amount too large");

        let net = net_balance(sales, Money::from_paise(i64::MIN)).unwrap();
        assert_eq!(net.amount, Money::from_paise(i64::MAX));
        assert!(!net.is_negative);

        let expenses = [expense(i64::MAX), expense(1)];
        assert_eq!(total_expenses(&expenses), Money::from_paise(i64::MAX));
    }

    #[test]
    fn test_reference_totals() {
        let rows = vec![item(10.0, 50.0)];
        let totals = InvoiceTotals::compute(&rows, &[expense(10_000)]);
        assert_eq!(totals.total_sales.map(|m| m.paise()), Some(50_000));
        assert_eq!(totals.total_expenses.paise(), 10_000);
        let net = totals.net_balance.unwrap();
        assert_eq!(net.amount.paise(), 40_000);
        assert!(!net.is_negative);
    }

    #[test]
    fn test_tax_igst() {
        let t = TaxBreakdown::compute(Money::from_paise(100_000), TaxRate::from_bps(1800), TaxMode::Igst);
        assert_eq!(t.igst.map(|m| m.paise()), Some(18_000));
        assert_eq!(t.cgst, None);
        assert_eq!(t.sgst, None);
        assert_eq!(t.net_payable.paise(), 118_000);
    }

    #[test]
    fn test_tax_split_rounds_each_half() {
        // 12.35 @ 5%: each half 0.30875 → 0.31
        let t = TaxBreakdown::compute(Money::from_paise(1235), TaxRate::from_bps(500), TaxMode::CgstSgst);
        assert_eq!(t.cgst.map(|m| m.paise()), Some(31));
        assert_eq!(t.sgst.map(|m| m.paise()), Some(31));
        assert_eq!(t.total_tax.paise(), 62);

        // 0.50 @ 5%: halves 0.0125 → 0.01 each = 0.02, whole rate 0.025 → 0.03
        let t = TaxBreakdown::compute(Money::from_paise(50), TaxRate::from_bps(500), TaxMode::CgstSgst);
        assert_eq!(t.total_tax.paise(), 2);
        assert_eq!(t.net_payable.paise(), 52);
    }

    #[test]
    fn test_invoice_summary_without_tax() {
        let summary = invoice().summary();
        assert_eq!(summary.totals.total_sales.map(|m| m.paise()), Some(10_000_000));
        assert_eq!(summary.totals.total_expenses, Money::zero());
        assert_eq!(summary.tax, None);
        assert_eq!(summary.net_payable.map(|m| m.paise()), Some(10_000_000));
        assert_eq!(summary.amount_in_words, "One Lakh Rupees only");
    }

    #[test]
    fn test_invoice_summary_with_tax() {
        let mut inv = invoice();
        inv.tax = Some(TaxConfig {
            rate: TaxRate::from_bps(1800),
            mode: TaxMode::CgstSgst,
        });
        let summary = inv.summary();
        let tax = summary.tax.unwrap();
        assert_eq!(tax.cgst.map(|m| m.paise()), Some(900_000));
        assert_eq!(summary.net_payable.map(|m| m.paise()), Some(11_800_000));
        assert_eq!(summary.amount_in_words, "One Lakh Eighteen Thousand Rupees only");
    }

    #[test]
    fn test_negative_balance_is_not_taxed() {
        let mut inv = invoice();
        inv.expenses = vec![expense(12_000_000)];
        inv.tax = Some(TaxConfig {
            rate: TaxRate::from_bps(1800),
            mode: TaxMode::Igst,
        });
        let summary = inv.summary();
        assert_eq!(summary.tax, None);
        assert_eq!(summary.net_payable.map(|m| m.paise()), Some(-2_000_000));
        assert_eq!(summary.amount_in_words, "Minus Twenty Thousand Rupees only");
    }

    #[test]
    fn test_blank_invoice_summary() {
        let mut inv = invoice();
        inv.screenings.clear();
        inv.line_items = vec![item(0.0, 0.0)];
        assert!(!inv.has_billable_rows());

        let summary = inv.summary();
        assert_eq!(summary.totals.total_sales, None);
        assert_eq!(summary.totals.net_balance, None);
        assert_eq!(summary.net_payable, None);
        assert_eq!(summary.amount_in_words, "");
    }
}
