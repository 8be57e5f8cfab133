use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("{tool} not found. Install poppler and tesseract: brew install poppler tesseract (macOS) or apt install poppler-utils tesseract-ocr (Linux)")]
    ToolNotFound { tool: &'static str },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("cannot place glyph '{text}': {reason}")]
    GlyphRejected { text: String, reason: String },

    #[error("unknown conversion type '{0}'. Available: pdf-to-excel, pdf-to-word, pdf-to-text, scanned-to-searchable, invoice-to-table")]
    UnknownConversion(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
