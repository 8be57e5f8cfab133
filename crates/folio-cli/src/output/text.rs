use folio_core::convert::outcome::{Sheet, SummaryRow};
use folio_core::invoice::format_amount;
use folio_core::model::{InvoiceRecord, ParagraphKind};
use folio_core::{Conversion, ConversionOutput};
use std::fmt::Write;

pub fn render(conversion: &Conversion) -> String {
    let mut out = String::new();
    match &conversion.output {
        ConversionOutput::Sheets { sheets } => {
            for (i, sheet) in sheets.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_sheet(&mut out, sheet);
            }
        }
        ConversionOutput::Document { sections } => {
            for section in sections {
                let _ = writeln!(out, "--- Page {} ---\n", section.page);
                for p in &section.paragraphs {
                    match p.kind {
                        ParagraphKind::Heading => {
                            let _ = writeln!(out, "# {}\n", p.text);
                        }
                        ParagraphKind::Body => {
                            let _ = writeln!(out, "{}\n", p.text);
                        }
                    }
                }
            }
        }
        ConversionOutput::Text { text } => out.push_str(text),
        ConversionOutput::Searchable {
            pages,
            average_confidence,
            warnings,
        } => {
            for page in pages {
                let _ = writeln!(
                    out,
                    "  Page {:<4} {:>5} glyphs  {:>3} skipped  confidence {:.1}%",
                    page.page,
                    page.glyphs.len(),
                    page.skipped,
                    page.confidence
                );
            }
            let _ = writeln!(out, "\n  Average confidence: {average_confidence:.1}%");
            if !warnings.is_empty() {
                out.push_str("\nWarnings:\n");
                for w in warnings {
                    let _ = writeln!(out, "  - {w}");
                }
            }
        }
        ConversionOutput::Invoice { record, summary } => write_invoice(&mut out, record, summary),
    }
    out.trim_end().to_string()
}

fn write_sheet(out: &mut String, sheet: &Sheet) {
    let _ = writeln!(out, "=== {} ===", sheet.name);
    let columns = sheet.rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            sheet
                .rows
                .iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
                .min(40)
        })
        .collect();

    for row in &sheet.rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| format!("{:<width$}", cell, width = widths[c]))
            .collect();
        let _ = writeln!(out, "  {}", line.join("  ").trim_end());
    }
}

fn write_invoice(out: &mut String, record: &InvoiceRecord, summary: &[SummaryRow]) {
    let width = summary.iter().map(|r| r.field.len()).max().unwrap_or(0);
    for row in summary {
        let _ = writeln!(out, "  {:<width$}  {}", row.field, row.value);
    }
    if record.vendor_defaulted {
        out.push_str("  (vendor not found; placeholder shown)\n");
    }

    if !record.line_items.is_empty() {
        out.push_str("\nLine items:\n");
        for item in &record.line_items {
            let _ = writeln!(
                out,
                "  {:<40} {:>6} {:>12} {:>12}",
                item.description,
                item.quantity,
                format_amount(item.unit_price, record.currency),
                format_amount(item.total, record.currency)
            );
        }
    }
}
