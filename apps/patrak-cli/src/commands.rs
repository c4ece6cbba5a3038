//! Subcommand handlers.
//!
//! Each handler prints its result to stdout. The string-building halves are
//! kept separate so they can be tested without capturing output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use patrak_core::amount::{amount_to_words, format_amount};
use patrak_core::numerals::parse_number;
use patrak_core::record::{ClientReport, InvoiceRecord, InvoiceSummaryRow};
use patrak_core::validation::validate_invoice;
use patrak_core::Invoice;
use patrak_lipi::{InvoiceDisplay, LipiConfig, Transliterator};

// =============================================================================
// Numbers
// =============================================================================

pub fn format_text(amount: &str, decimals: usize) -> String {
    format_amount(Some(parse_number(amount)), decimals)
}

pub fn format(amount: &str, decimals: usize) {
    println!("{}", format_text(amount, decimals));
}

pub fn words(amount: &str) {
    println!("{}", amount_to_words(parse_number(amount)));
}

// =============================================================================
// Transliteration
// =============================================================================

pub async fn translit(config: &LipiConfig, text: &str, local: bool) {
    let engine = Transliterator::from_config(config);
    let result = if local {
        engine.transliterate_text_local(text)
    } else {
        engine.transliterate_text(text).await
    };

    info!(confidence = ?result.confidence, "Transliterated");
    println!("{}", result.text);
}

// =============================================================================
// Invoices
// =============================================================================

pub fn load_invoice(path: &Path) -> Result<Invoice> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_invoice(&contents).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_invoice(json: &str) -> Result<Invoice> {
    let invoice: Invoice = serde_json::from_str(json)?;
    validate_invoice(&invoice)?;
    Ok(invoice)
}

/// Persistence record for a validated invoice, stamped now.
pub fn record_json(invoice: &Invoice) -> Result<Value> {
    let record = InvoiceRecord::new(invoice, Uuid::new_v4(), Utc::now())?;
    Ok(serde_json::to_value(record)?)
}

pub async fn invoice(config: &LipiConfig, path: &Path, record: bool, local: bool) -> Result<()> {
    let invoice = load_invoice(path)?;

    let output = if record {
        record_json(&invoice)?
    } else {
        let engine = Transliterator::from_config(config);
        let display = if local {
            InvoiceDisplay::prepare_local(&invoice, &engine)
        } else {
            InvoiceDisplay::prepare(&invoice, &engine).await
        };
        serde_json::to_value(display)?
    };

    info!(invoice_number = %invoice.number, record, "Invoice prepared");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// =============================================================================
// Reports
// =============================================================================

/// Aggregates `invoices`, optionally limited to a date range.
///
/// An open end of the range is unbounded.
pub fn build_report(invoices: &[Invoice], from: Option<NaiveDate>, to: Option<NaiveDate>) -> ClientReport {
    let rows: Vec<InvoiceSummaryRow> = invoices.iter().map(InvoiceSummaryRow::from_invoice).collect();
    match (from, to) {
        (None, None) => ClientReport::aggregate(&rows),
        (from, to) => ClientReport::aggregate_period(
            &rows,
            from.unwrap_or(NaiveDate::MIN),
            to.unwrap_or(NaiveDate::MAX),
        ),
    }
}

pub fn report(files: &[PathBuf], from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let invoices = files
        .iter()
        .map(|f| load_invoice(f))
        .collect::<Result<Vec<_>>>()?;

    let report = build_report(&invoices, from, to);
    info!(clients = report.lines.len(), invoices = invoices.len(), "Report built");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

pub fn config_show(config: &LipiConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub fn config_init(path: Option<PathBuf>) -> Result<()> {
    LipiConfig::default()
        .save(path)
        .context("writing lipi config")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICE: &str = r#"{
        "number": "INV-17",
        "date": "2024-03-09",
        "client_name": "Bhaskar Talkies",
        "place": "Pune",
        "screenings": [
            { "date": "01/03/2024", "shows": 4, "audience": 1204, "collection": 15250.5 }
        ],
        "expenses": [
            { "label": "Poster", "amount": 125050 }
        ]
    }"#;

    #[test]
    fn test_format_text_accepts_devanagari_input() {
        assert_eq!(format_text("१२३४५६७.८९", 2), "१२,३४,५६७.८९");
        assert_eq!(format_text("abc", 2), "");
    }

    #[test]
    fn test_parse_invoice_validates() {
        let invoice = parse_invoice(INVOICE).unwrap();
        assert_eq!(invoice.summary().net_payable.map(|m| m.paise()), Some(1_400_000));

        let bad = INVOICE.replace("INV-17", "");
        assert!(parse_invoice(&bad).is_err());
    }

    #[test]
    fn test_record_json_has_identity_and_null_blanks() {
        let invoice = parse_invoice(INVOICE).unwrap();
        let json = record_json(&invoice).unwrap();
        assert!(json["id"].is_string());
        assert_eq!(json["invoice_number"], "INV-17");
        assert!(json["igst"].is_null());
    }

    #[test]
    fn test_build_report_open_range() {
        let invoice = parse_invoice(INVOICE).unwrap();
        let invoices = vec![invoice.clone(), invoice];

        let all = build_report(&invoices, None, None);
        assert_eq!(all.lines.len(), 1);
        assert_eq!(all.totals.invoice_count, 2);

        let later = build_report(&invoices, NaiveDate::from_ymd_opt(2024, 4, 1), None);
        assert!(later.lines.is_empty());
    }

    #[test]
    fn test_config_init_writes_loadable_defaults() {
        let path = std::env::temp_dir()
            .join(format!("patrak-cli-{}", Uuid::new_v4()))
            .join("lipi.toml");
        config_init(Some(path.clone())).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[backend]"));

        let loaded = LipiConfig::load_with(Some(path.clone()), |_| None).unwrap();
        assert_eq!(loaded, LipiConfig::default());

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).unwrap();
        }
    }
}
