use crate::model::{InvoiceRecord, Paragraph, PlacedGlyph};
use serde::Serialize;
use std::path::PathBuf;

/// Longest sheet name a spreadsheet accepts.
pub const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet, truncating the name to [`MAX_SHEET_NAME`] characters.
    pub fn new(name: &str, rows: Vec<Vec<String>>) -> Self {
        Sheet {
            name: name.chars().take(MAX_SHEET_NAME).collect(),
            rows,
        }
    }
}

/// Paragraphs of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub page: usize,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchablePage {
    pub page: usize,
    pub ocr_text: String,
    /// Mean OCR word confidence, 0 to 100.
    pub confidence: f32,
    pub glyphs: Vec<PlacedGlyph>,
    /// Words the text layer could not encode.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionOutput {
    Sheets {
        sheets: Vec<Sheet>,
    },
    Document {
        sections: Vec<Section>,
    },
    Text {
        text: String,
    },
    Searchable {
        pages: Vec<SearchablePage>,
        average_confidence: f32,
        /// Pages that got no text layer, one message each.
        warnings: Vec<String>,
    },
    Invoice {
        record: InvoiceRecord,
        summary: Vec<SummaryRow>,
    },
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub input: PathBuf,
    /// Where a writer for this conversion type would place its file.
    pub output_path: PathBuf,
    pub output: ConversionOutput,
}
