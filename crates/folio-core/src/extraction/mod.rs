pub mod pdftotext;

use crate::error::FolioError;
use crate::model::Document;
use std::path::Path;

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned text for every page of the PDF at `path`.
    ///
    /// Either every page is returned or the call fails; there are no partial
    /// results.
    fn extract_document(&self, path: &Path) -> Result<Document, FolioError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
