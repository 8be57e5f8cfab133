use crate::config::schema::LayoutConfig;
use crate::convert::outcome::{ConversionOutput, SearchablePage};
use crate::convert::Backends;
use crate::error::FolioError;
use crate::model::Page;
use crate::ocr::align::{overlay_words, PageGeometry, TextLayer};
use crate::ocr::{OcrPage, PageSelector};
use crate::progress::{page_progress, ProgressTracker};
use std::path::Path;

/// Recognize every page, then lay the words back over the pages as
/// invisible glyphs.
///
/// When a page fails to recognize, one whole-document pass is attempted and
/// its result is attached to that page. Pages after it get no text layer.
pub(super) fn to_searchable(
    input: &Path,
    backends: &Backends<'_>,
    config: &LayoutConfig,
    tracker: &mut ProgressTracker,
) -> Result<ConversionOutput, FolioError> {
    tracker.processing(5, "Loading PDF...");
    let doc = backends.extractor.extract_document(input)?;
    let total = doc.num_pages;
    tracker.processing(10, format!("Processing {total} pages with OCR..."));

    let mut recognized: Vec<(&Page, OcrPage)> = Vec::new();
    let mut warnings = Vec::new();
    {
        let mut session = backends.ocr.acquire()?;
        for (i, page) in doc.pages.iter().enumerate() {
            tracker.page(
                page_progress(10, 70, i, total),
                i + 1,
                total,
                format!("OCR processing page {} of {total}...", i + 1),
            );

            match session.recognize(input, PageSelector::Page(page.index)) {
                Ok(ocr) => recognized.push((page, ocr)),
                Err(e) => {
                    tracing::warn!(page = page.index, "page OCR failed, retrying whole document: {e}");
                    let ocr = session.recognize(input, PageSelector::Document)?;
                    recognized.push((page, ocr));
                    for skipped in &doc.pages[i + 1..] {
                        let msg = format!(
                            "page {}: no text layer (OCR fell back to a single whole-document pass)",
                            skipped.index
                        );
                        tracing::warn!("{msg}");
                        warnings.push(msg);
                    }
                    break;
                }
            }
        }
    }

    tracker.processing(85, "Adding invisible text layer...");
    let mut pages = Vec::with_capacity(recognized.len());
    for (page, ocr) in recognized {
        let geometry = PageGeometry {
            page_width: page.width,
            page_height: page.height,
            image_width: ocr.image_width,
            image_height: ocr.image_height,
        };
        let mut layer = TextLayer::new();
        let report = match overlay_words(&ocr.words, &geometry, config, &mut layer) {
            Ok(report) => report,
            Err(e) => {
                let msg = format!("page {}: no text layer ({e})", page.index);
                tracing::warn!("{msg}");
                warnings.push(msg);
                continue;
            }
        };
        tracing::debug!(
            page = page.index,
            placed = report.placed,
            skipped = report.skipped,
            "text layer built"
        );
        pages.push(SearchablePage {
            page: page.index,
            ocr_text: ocr.text,
            confidence: ocr.confidence,
            glyphs: layer.into_glyphs(),
            skipped: report.skipped,
        });
    }

    tracker.processing(95, "Saving searchable PDF...");
    let average_confidence = if pages.is_empty() {
        0.0
    } else {
        pages.iter().map(|p| p.confidence).sum::<f32>() / pages.len() as f32
    };
    tracker.completed(format!(
        "OCR complete! Average confidence: {average_confidence:.1}%"
    ));

    Ok(ConversionOutput::Searchable {
        pages,
        average_confidence,
        warnings,
    })
}
