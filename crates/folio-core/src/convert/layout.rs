use crate::config::schema::LayoutConfig;
use crate::convert::outcome::{ConversionOutput, Section, Sheet};
use crate::error::FolioError;
use crate::extraction::PdfExtractor;
use crate::layout::{paragraph, rows, table, text};
use crate::model::Document;
use crate::progress::{page_progress, ProgressTracker};
use std::path::Path;

fn read(
    input: &Path,
    extractor: &dyn PdfExtractor,
    tracker: &mut ProgressTracker,
) -> Result<Document, FolioError> {
    tracker.processing(10, "Reading PDF...");
    extractor.extract_document(input)
}

pub(super) fn to_sheets(
    input: &Path,
    extractor: &dyn PdfExtractor,
    config: &LayoutConfig,
    tracker: &mut ProgressTracker,
) -> Result<ConversionOutput, FolioError> {
    let doc = read(input, extractor, tracker)?;
    let total = doc.num_pages;
    tracker.processing(30, format!("Detecting tables in {total} pages..."));

    let mut sheets = Vec::new();
    for (i, page) in doc.pages.iter().enumerate() {
        tracker.page(
            page_progress(30, 50, i, total),
            i + 1,
            total,
            format!("Processing page {} of {total}...", i + 1),
        );

        let page_rows = rows::cluster_rows(&page.fragments, config.row_threshold);
        let tables = table::detect_tables(&page_rows, page.height, config);
        tracing::debug!(page = i + 1, rows = page_rows.len(), tables = tables.len(), "page layout");

        if tables.is_empty() {
            sheets.push(Sheet::new(&format!("Page{}", i + 1), table::raw_rows(&page_rows)));
            continue;
        }
        for (k, t) in tables.iter().enumerate() {
            let grid: Vec<Vec<String>> = t
                .cells
                .iter()
                .map(|row| row.iter().map(|c| c.text.clone()).collect())
                .collect();
            sheets.push(Sheet::new(&format!("Page{}_Table{}", i + 1, k + 1), grid));
        }
    }

    if sheets.is_empty() {
        let content: Vec<Vec<String>> = doc.pages.iter().map(|p| vec![p.full_text.clone()]).collect();
        sheets.push(Sheet::new("Content", content));
    }

    tracker.processing(90, "Saving Excel file...");
    tracker.completed("Conversion complete!");
    Ok(ConversionOutput::Sheets { sheets })
}

pub(super) fn to_document(
    input: &Path,
    extractor: &dyn PdfExtractor,
    config: &LayoutConfig,
    tracker: &mut ProgressTracker,
) -> Result<ConversionOutput, FolioError> {
    let doc = read(input, extractor, tracker)?;
    let total = doc.num_pages;
    tracker.processing(30, format!("Converting {total} pages to Word..."));

    let mut sections = Vec::with_capacity(total);
    for (i, page) in doc.pages.iter().enumerate() {
        tracker.page(
            page_progress(30, 50, i, total),
            i + 1,
            total,
            format!("Converting page {} of {total}...", i + 1),
        );
        let paragraphs = paragraph::build_paragraphs(&page.fragments, &page.full_text, config);
        tracing::debug!(page = i + 1, paragraphs = paragraphs.len(), "page layout");
        sections.push(Section {
            page: page.index,
            paragraphs,
        });
    }

    tracker.processing(85, "Creating Word document...");
    tracker.processing(90, "Saving Word document...");
    tracker.completed("Conversion complete!");
    Ok(ConversionOutput::Document { sections })
}

pub(super) fn to_text(
    input: &Path,
    extractor: &dyn PdfExtractor,
    config: &LayoutConfig,
    tracker: &mut ProgressTracker,
) -> Result<ConversionOutput, FolioError> {
    let doc = read(input, extractor, tracker)?;
    let total = doc.num_pages;
    tracker.processing(30, format!("Processing {total} pages..."));

    let mut pages = Vec::with_capacity(total);
    for (i, page) in doc.pages.iter().enumerate() {
        tracker.page(
            page_progress(30, 50, i, total),
            i + 1,
            total,
            format!("Processing page {} of {total}...", i + 1),
        );
        let reading = rows::reading_text(&page.fragments, config.row_threshold);
        pages.push(text::clean_page_text(&reading, page.index, total));
    }

    tracker.processing(90, "Saving text file...");
    tracker.completed("Conversion complete!");
    Ok(ConversionOutput::Text {
        text: pages.join("\n\n"),
    })
}
