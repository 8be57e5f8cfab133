use crate::config::schema::LayoutConfig;
use crate::convert::outcome::{ConversionOutput, SummaryRow};
use crate::error::FolioError;
use crate::extraction::PdfExtractor;
use crate::invoice::{extract_invoice, summary_rows};
use crate::layout::rows;
use crate::model::TextFragment;
use crate::progress::ProgressTracker;
use std::path::Path;

pub(super) fn to_invoice(
    input: &Path,
    extractor: &dyn PdfExtractor,
    config: &LayoutConfig,
    tracker: &mut ProgressTracker,
) -> Result<ConversionOutput, FolioError> {
    tracker.processing(10, "Reading invoice...");
    let doc = extractor.extract_document(input)?;

    tracker.processing(30, "Extracting invoice data...");
    // Reading order keeps labels next to their values.
    let text = doc
        .pages
        .iter()
        .map(|p| rows::reading_text(&p.fragments, config.row_threshold))
        .collect::<Vec<_>>()
        .join("\n");
    let fragments: Vec<TextFragment> = doc.fragments().cloned().collect();

    tracker.processing(50, "Parsing invoice fields...");
    let record = extract_invoice(&text, &fragments, config);

    tracker.processing(70, "Creating Excel output...");
    let summary = summary_rows(&record)
        .into_iter()
        .map(|(field, value)| SummaryRow { field, value })
        .collect();

    tracker.processing(90, "Saving Excel file...");
    tracker.completed(format!(
        "Invoice parsed! Confidence: {:.0}%",
        record.confidence
    ));
    Ok(ConversionOutput::Invoice { record, summary })
}
