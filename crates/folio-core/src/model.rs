use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One atomic run of text at a known position on a page.
///
/// Coordinates follow the PDF convention: origin at the bottom-left corner,
/// Y grows upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        TextFragment {
            text: text.into(),
            x,
            y,
            width,
            height,
            font_name: None,
        }
    }
}

/// A single page as produced by text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub index: usize,
    pub width: f32,
    pub height: f32,
    /// Fragments in extraction order (not necessarily reading order).
    pub fragments: Vec<TextFragment>,
    /// Space-joined fragment text in extraction order.
    pub full_text: String,
}

impl Page {
    pub fn new(index: usize, width: f32, height: f32, fragments: Vec<TextFragment>) -> Self {
        let full_text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Page {
            index,
            width,
            height,
            fragments,
            full_text,
        }
    }
}

/// Text extraction result for a whole PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub num_pages: usize,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Document {
            num_pages: pages.len(),
            pages,
        }
    }

    /// Every fragment of every page, in page order.
    pub fn fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.pages.iter().flat_map(|p| p.fragments.iter())
    }
}

/// A horizontal band of fragments sharing a quantized Y coordinate.
///
/// Rows borrow from their page and only live for one detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub quantized_y: f32,
    /// Sorted ascending by X.
    pub fragments: Vec<&'a TextFragment>,
}

impl Row<'_> {
    /// Space-joined text of the row in left-to-right order.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub row: usize,
    pub col: usize,
}

/// A rectangular grid of cells recovered from positioned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedTable {
    pub cells: Vec<Vec<Cell>>,
    pub start_y: f32,
    pub end_y: f32,
}

impl DetectedTable {
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphKind {
    Body,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub text: String,
}

impl Paragraph {
    pub fn body(text: impl Into<String>) -> Self {
        Paragraph {
            kind: ParagraphKind::Body,
            text: text.into(),
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Paragraph {
            kind: ParagraphKind::Heading,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "JPY")]
    Jpy,
    #[serde(rename = "CAD")]
    Cad,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
        }
    }

    /// Display symbol used when rendering amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Cad => "C$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u64,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Structured invoice fields recovered from free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub vendor: String,
    /// True when `vendor` holds the placeholder rather than a matched line.
    pub vendor_defaulted: bool,
    pub invoice_number: String,
    pub date: String,
    pub due_date: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: Currency,
    pub line_items: Vec<LineItem>,
    /// Share of the 7 tracked fields that were found, 0 to 100.
    pub confidence: f32,
    /// Local confidence (0 to 1) of the rule that produced each found field.
    #[serde(default)]
    pub field_confidence: BTreeMap<String, f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcrBBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// A recognized word in image pixel space (Y grows downward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub bbox: OcrBBox,
    pub confidence: f32,
}

/// Glyph opacity. The only constructible value is fully transparent, so a
/// placed glyph can never alter the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Opacity(f32);

impl Opacity {
    pub const TRANSPARENT: Opacity = Opacity(0.0);

    pub fn value(&self) -> f32 {
        self.0
    }
}

/// An invisible text placement in page vector space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedGlyph {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub opacity: Opacity,
}
