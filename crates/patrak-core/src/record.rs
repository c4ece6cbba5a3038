//! # Persistence Record & Reports
//!
//! Turns invoices into the flat record handed to the storage HTTP layer, and
//! aggregates stored invoices into per-client report rows.
//!
//! ## Record Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {                                                                      │
//! │    "id": "…uuid…",              ◄── InvoiceRecord only                  │
//! │    "created_at": "…rfc3339…",   ◄── InvoiceRecord only                  │
//! │    "invoice_number": "PT-2024-031",                                     │
//! │    "invoice_date": "2024-03-08",                                        │
//! │    "client_name": "Bhaskar Talkies",                                    │
//! │    "total_sales": 100000.0,      ◄── null when blank, never 0           │
//! │    "total_expenses": 0.0,        ◄── zero allowed                       │
//! │    "net_balance": 100000.0,                                             │
//! │    ...                                                                  │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Amounts are decimal rupees (JSON numbers). The record defines no wire
//! format beyond "JSON object".

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Invoice;

/// Flat field-name → value map.
pub type Record = Map<String, Value>;

fn rupees(amount: Option<Money>) -> Value {
    json!(amount.map(|m| m.to_f64()))
}

// =============================================================================
// Invoice Record
// =============================================================================

impl Invoice {
    /// Fails with [`CoreError::NothingBillable`] when no row has an amount.
    ///
    /// Display paths accept blank invoices; storing one is refused.
    pub fn ensure_billable(&self) -> CoreResult<()> {
        if self.has_billable_rows() {
            Ok(())
        } else {
            Err(CoreError::NothingBillable {
                invoice_number: self.number.clone(),
            })
        }
    }

    /// Builds the flat persistence record for this invoice.
    ///
    /// Blank amounts are JSON `null`; they are never written as `0`.
    pub fn to_record(&self) -> CoreResult<Record> {
        let summary = self.summary();
        let totals = summary.totals;
        let tax = summary.tax;

        let value = json!({
            "invoice_number": self.number,
            "invoice_date": self.date.format("%Y-%m-%d").to_string(),
            "client_name": self.client_name,
            "place": self.place,
            "film_title": self.film_title,
            "period": self.period,
            "row_count": self.screenings.len() + self.line_items.len(),
            "total_sales": rupees(totals.total_sales),
            "total_expenses": totals.total_expenses.to_f64(),
            "net_balance": rupees(totals.net_balance.map(|n| n.signed())),
            "net_is_negative": totals.net_balance.map(|n| n.is_negative),
            "tax_mode": tax.map(|t| t.mode).map(serde_json::to_value).transpose()?,
            "tax_rate": tax.map(|t| t.rate.percentage()),
            "igst": rupees(tax.and_then(|t| t.igst)),
            "cgst": rupees(tax.and_then(|t| t.cgst)),
            "sgst": rupees(tax.and_then(|t| t.sgst)),
            "net_payable": rupees(summary.net_payable),
            "amount_in_words": summary.amount_in_words,
        });

        match value {
            Value::Object(map) => Ok(map),
            other => Err(CoreError::Record(format!("expected object, got {}", other))),
        }
    }
}

/// A record stamped with identity, ready to store.
///
/// The caller supplies the id and timestamp so this crate stays free of
/// clocks and randomness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Record,
}

impl InvoiceRecord {
    /// Builds a stamped record. Refuses invoices with nothing billable.
    pub fn new(invoice: &Invoice, id: Uuid, created_at: DateTime<Utc>) -> CoreResult<Self> {
        invoice.ensure_billable()?;
        Ok(InvoiceRecord {
            id,
            created_at,
            fields: invoice.to_record()?,
        })
    }
}

// =============================================================================
// Client Report
// =============================================================================

/// The slice of a stored invoice that reports need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceSummaryRow {
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub client_name: String,
    pub total_sales: Option<Money>,
    pub total_expenses: Money,
    pub net_payable: Option<Money>,
}

impl InvoiceSummaryRow {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let summary = invoice.summary();
        InvoiceSummaryRow {
            invoice_number: invoice.number.clone(),
            date: invoice.date,
            client_name: invoice.client_name.trim().to_string(),
            total_sales: summary.totals.total_sales,
            total_expenses: summary.totals.total_expenses,
            net_payable: summary.net_payable,
        }
    }
}

/// One aggregated report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientReportLine {
    pub client_name: String,
    pub invoice_count: usize,
    pub total_sales: Money,
    pub total_expenses: Money,
    pub net_payable: Money,
}

impl ClientReportLine {
    fn empty(client_name: impl Into<String>) -> Self {
        ClientReportLine {
            client_name: client_name.into(),
            invoice_count: 0,
            total_sales: Money::zero(),
            total_expenses: Money::zero(),
            net_payable: Money::zero(),
        }
    }

    fn add(&mut self, row: &InvoiceSummaryRow) {
        self.invoice_count += 1;
        self.total_sales += row.total_sales.unwrap_or_default();
        self.total_expenses += row.total_expenses;
        self.net_payable += row.net_payable.unwrap_or_default();
    }
}

/// Per-client aggregate over stored invoices, sorted by client name, with a
/// grand total line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientReport {
    pub lines: Vec<ClientReportLine>,
    pub totals: ClientReportLine,
}

impl ClientReport {
    /// Label of the grand total line.
    pub const TOTAL_LABEL: &'static str = "Total";

    /// Aggregates every row.
    pub fn aggregate(rows: &[InvoiceSummaryRow]) -> Self {
        Self::aggregate_filtered(rows.iter())
    }

    /// Aggregates rows dated within `from..=to`.
    pub fn aggregate_period(rows: &[InvoiceSummaryRow], from: NaiveDate, to: NaiveDate) -> Self {
        Self::aggregate_filtered(rows.iter().filter(|r| r.date >= from && r.date <= to))
    }

    fn aggregate_filtered<'a>(rows: impl Iterator<Item = &'a InvoiceSummaryRow>) -> Self {
        let mut by_client: BTreeMap<String, ClientReportLine> = BTreeMap::new();
        let mut totals = ClientReportLine::empty(Self::TOTAL_LABEL);

        for row in rows {
            by_client
                .entry(row.client_name.clone())
                .or_insert_with(|| ClientReportLine::empty(row.client_name.clone()))
                .add(row);
            totals.add(row);
        }

        ClientReport {
            lines: by_client.into_values().collect(),
            totals,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExpenseEntry, InvoiceLineItem, TaxConfig, TaxMode, TaxRate};

    fn invoice(number: &str, client: &str, quantity: f64) -> Invoice {
        Invoice {
            number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            client_name: client.to_string(),
            place: "Nashik".to_string(),
            film_title: "Natsamrat".to_string(),
            period: String::new(),
            screenings: vec![],
            line_items: vec![InvoiceLineItem {
                date: "08/03/2024".to_string(),
                quantity,
                unit_price: 1_000.0,
            }],
            expenses: vec![ExpenseEntry {
                label: "Courier".to_string(),
                amount: Money::from_paise(25_000),
            }],
            tax: None,
        }
    }

    #[test]
    fn test_record_fields() {
        let record = invoice("PT-1", "Sangli Cinema", 3.0).to_record().unwrap();
        assert_eq!(record["invoice_number"], "PT-1");
        assert_eq!(record["invoice_date"], "2024-03-08");
        assert_eq!(record["total_sales"], 3000.0);
        assert_eq!(record["total_expenses"], 250.0);
        assert_eq!(record["net_balance"], 2750.0);
        assert_eq!(record["net_is_negative"], false);
        assert_eq!(record["row_count"], 1);
        assert!(record["tax_mode"].is_null());
    }

    #[test]
    fn test_blank_amounts_are_null() {
        let record = invoice("PT-2", "Sangli Cinema", 0.0).to_record().unwrap();
        assert!(record["total_sales"].is_null());
        assert!(record["net_balance"].is_null());
        assert!(record["net_payable"].is_null());
        assert_eq!(record["total_expenses"], 250.0);
        assert_eq!(record["amount_in_words"], "");
    }

    #[test]
    fn test_record_with_tax() {
        let mut inv = invoice("PT-3", "Sangli Cinema", 1.0);
        inv.expenses.clear();
        inv.tax = Some(TaxConfig {
            rate: TaxRate::from_bps(1800),
            mode: TaxMode::Igst,
        });
        let record = inv.to_record().unwrap();
        assert_eq!(record["tax_mode"], "igst");
        assert_eq!(record["tax_rate"], 18.0);
        assert_eq!(record["igst"], 180.0);
        assert!(record["cgst"].is_null());
        assert_eq!(record["net_payable"], 1180.0);
    }

    #[test]
    fn test_stamped_record_refuses_blank_invoice() {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let err = InvoiceRecord::new(&invoice("PT-4", "X", 0.0), id, now).unwrap_err();
        assert!(matches!(err, CoreError::NothingBillable { .. }));

        let rec = InvoiceRecord::new(&invoice("PT-5", "X", 2.0), id, now).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["invoice_number"], "PT-5");
    }

    #[test]
    fn test_client_report_groups_and_sorts() {
        let rows: Vec<InvoiceSummaryRow> = [
            invoice("PT-1", "Satara Talkies", 2.0),
            invoice("PT-2", "  Kolhapur Chitra ", 1.0),
            invoice("PT-3", "Satara Talkies", 3.0),
            invoice("PT-4", "Kolhapur Chitra", 0.0),
        ]
        .iter()
        .map(InvoiceSummaryRow::from_invoice)
        .collect();

        let report = ClientReport::aggregate(&rows);
        assert_eq!(report.lines.len(), 2);

        let kolhapur = &report.lines[0];
        assert_eq!(kolhapur.client_name, "Kolhapur Chitra");
        assert_eq!(kolhapur.invoice_count, 2);
        assert_eq!(kolhapur.total_sales.paise(), 100_000);
        assert_eq!(kolhapur.total_expenses.paise(), 50_000);
        assert_eq!(kolhapur.net_payable.paise(), 75_000);

        let satara = &report.lines[1];
        assert_eq!(satara.invoice_count, 2);
        assert_eq!(satara.total_sales.paise(), 500_000);

        assert_eq!(report.totals.client_name, ClientReport::TOTAL_LABEL);
        assert_eq!(report.totals.invoice_count, 4);
        assert_eq!(report.totals.total_sales.paise(), 600_000);
    }

    #[test]
    fn test_client_report_period_filter() {
        let mut early = invoice("PT-1", "Thane Plaza", 1.0);
        early.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let late = invoice("PT-2", "Thane Plaza", 1.0);

        let rows = vec![
            InvoiceSummaryRow::from_invoice(&early),
            InvoiceSummaryRow::from_invoice(&late),
        ];
        let report = ClientReport::aggregate_period(
            &rows,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert_eq!(report.totals.invoice_count, 1);
        assert_eq!(report.lines[0].invoice_count, 1);
    }
}
