//! Invoice field recovery from free text.
//!
//! Each field is an ordered list of pattern rules carrying a local
//! confidence; the highest-confidence hit wins. A missing field is not an
//! error: it takes its empty/zero default and lowers the record confidence.

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod rules;

use crate::config::schema::LayoutConfig;
use crate::model::{Currency, InvoiceRecord, TextFragment};
use rules::FieldMatch;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Number of fields the confidence score is computed over.
pub const TRACKED_FIELDS: usize = 7;

/// Extract an invoice record from the concatenated text of a document.
///
/// `fragments` is accepted for layout-aware refinement; the rules currently
/// operate on text alone.
pub fn extract_invoice(text: &str, fragments: &[TextFragment], config: &LayoutConfig) -> InvoiceRecord {
    tracing::debug!(
        chars = text.len(),
        fragments = fragments.len(),
        "extracting invoice fields"
    );

    let mut field_confidence = BTreeMap::new();
    let mut record = |name: &str, hit: &Option<FieldMatch<String>>| -> String {
        match hit {
            Some(m) => {
                field_confidence.insert(name.to_string(), m.confidence);
                m.value.clone()
            }
            None => String::new(),
        }
    };

    let vendor_hit = fields::extract_vendor(text, config.vendor_scan_lines);
    let vendor_defaulted = vendor_hit.is_none();
    let vendor = match record("vendor", &vendor_hit) {
        v if v.is_empty() => fields::UNKNOWN_VENDOR.to_string(),
        v => v,
    };

    let invoice_number = record("invoice_number", &fields::extract_invoice_number(text));

    let dates = dates::extract_dates(text);
    let date = record("date", &dates.date);
    let due_date = record("due_date", &dates.due_date);

    let amounts = amounts::extract_amounts(text);
    let mut money = |name: &str, hit: &Option<FieldMatch<Decimal>>| -> Decimal {
        match hit {
            Some(m) => {
                field_confidence.insert(name.to_string(), m.confidence);
                m.value
            }
            None => Decimal::ZERO,
        }
    };
    let subtotal = money("subtotal", &amounts.subtotal);
    let tax = money("tax", &amounts.tax);
    let total = money("total", &amounts.total);

    let currency = fields::detect_currency(text);
    let line_items = fields::extract_line_items(text);

    // The placeholder vendor is non-empty and therefore counts as found.
    let found = [
        !vendor.is_empty(),
        !invoice_number.is_empty(),
        !date.is_empty(),
        !due_date.is_empty(),
        total > Decimal::ZERO,
        subtotal > Decimal::ZERO,
        tax > Decimal::ZERO,
    ]
    .iter()
    .filter(|f| **f)
    .count();
    let confidence = (found as f32 / TRACKED_FIELDS as f32 * 100.0).clamp(0.0, 100.0);

    if vendor_defaulted {
        tracing::debug!("no vendor line found; using placeholder");
    }

    InvoiceRecord {
        vendor,
        vendor_defaulted,
        invoice_number,
        date,
        due_date,
        subtotal,
        tax,
        total,
        currency,
        line_items,
        confidence,
        field_confidence,
    }
}

/// Render an amount for display: `-` for zero, otherwise the currency symbol
/// followed by the amount to two decimals.
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    if amount.is_zero() {
        return "-".to_string();
    }
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", currency.symbol(), rounded)
}

/// Field/Value rows summarizing a record, as shown in the invoice sheet.
pub fn summary_rows(record: &InvoiceRecord) -> Vec<(String, String)> {
    let c = record.currency;
    vec![
        ("Vendor".into(), record.vendor.clone()),
        ("Invoice Number".into(), record.invoice_number.clone()),
        ("Date".into(), record.date.clone()),
        ("Due Date".into(), record.due_date.clone()),
        ("Subtotal".into(), format_amount(record.subtotal, c)),
        ("Tax".into(), format_amount(record.tax, c)),
        ("Total".into(), format_amount(record.total, c)),
        ("Currency".into(), c.to_string()),
        (
            "Extraction Confidence".into(),
            format!("{:.0}%", record.confidence),
        ),
    ]
}
