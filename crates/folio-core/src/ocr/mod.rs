//! OCR collaborators and the text-layer aligner.
//!
//! An [`OcrEngine`] hands out one [`OcrSession`] per conversion. The session
//! is borrowed mutably for every recognition call and released when dropped.

pub mod align;
pub mod tesseract;

use crate::error::FolioError;
use crate::model::OcrWord;
use serde::Serialize;
use std::path::Path;

/// Which part of the document a recognition call covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    /// A single 1-based page.
    Page(usize),
    /// The whole document in one pass. Yields one page's worth of words.
    Document,
}

/// Recognition result for one rasterized page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrPage {
    pub text: String,
    pub words: Vec<OcrWord>,
    /// Mean word confidence, 0 to 100.
    pub confidence: f32,
    pub image_width: f32,
    pub image_height: f32,
}

pub trait OcrEngine: Send + Sync {
    /// Acquire a recognition session. Released on drop.
    fn acquire(&self) -> Result<Box<dyn OcrSession>, FolioError>;

    /// Name of this OCR backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

pub trait OcrSession {
    fn recognize(&mut self, pdf: &Path, selector: PageSelector) -> Result<OcrPage, FolioError>;
}

/// Mean of the given confidences, or 0 for none.
pub fn mean_confidence(words: &[OcrWord]) -> f32 {
    if words.is_empty() {
        return 0.0;
    }
    words.iter().map(|w| w.confidence).sum::<f32>() / words.len() as f32
}
