use serde::{Deserialize, Serialize};

/// Tunable thresholds for layout reconstruction, invoice extraction and OCR
/// alignment. All distances are in page units (points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Y quantization step used to bucket fragments into rows.
    pub row_threshold: f32,
    /// X gap that starts a new column cluster.
    pub column_gap: f32,
    /// Leftward slack applied to column edges when assigning fragments.
    pub column_slack: f32,
    /// Vertical distance between tabular rows that splits two tables.
    pub max_row_gap: f32,
    /// Y difference below which consecutive fragments share a line.
    pub line_threshold: f32,
    /// All-caps lines shorter than this (in chars) are headings.
    pub heading_max_len: usize,
    /// Colon-terminated lines shorter than this (in chars) are headings.
    pub colon_heading_max_len: usize,
    /// Number of leading non-blank lines scanned for a vendor name.
    pub vendor_scan_lines: usize,
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// Fraction of the scaled word box height used as glyph font size.
    pub font_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            name: "default".into(),
            description: None,
            row_threshold: 5.0,
            column_gap: 20.0,
            column_slack: 10.0,
            max_row_gap: 40.0,
            line_threshold: 5.0,
            heading_max_len: 50,
            colon_heading_max_len: 60,
            vendor_scan_lines: 5,
            min_font_size: 1.0,
            max_font_size: 20.0,
            font_scale: 0.8,
        }
    }
}
