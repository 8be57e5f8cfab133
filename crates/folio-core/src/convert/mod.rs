//! Conversion pipelines over the layout, invoice and OCR engines.

mod invoice;
mod layout;
pub mod outcome;
mod searchable;

use crate::config::schema::LayoutConfig;
use crate::error::FolioError;
use crate::extraction::PdfExtractor;
use crate::ocr::OcrEngine;
use crate::progress::ProgressTracker;
use outcome::Conversion;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionType {
    PdfToExcel,
    PdfToWord,
    PdfToText,
    ScannedToSearchable,
    InvoiceToTable,
}

impl ConversionType {
    pub const ALL: [ConversionType; 5] = [
        ConversionType::PdfToExcel,
        ConversionType::PdfToWord,
        ConversionType::PdfToText,
        ConversionType::ScannedToSearchable,
        ConversionType::InvoiceToTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionType::PdfToExcel => "pdf-to-excel",
            ConversionType::PdfToWord => "pdf-to-word",
            ConversionType::PdfToText => "pdf-to-text",
            ConversionType::ScannedToSearchable => "scanned-to-searchable",
            ConversionType::InvoiceToTable => "invoice-to-table",
        }
    }

    /// Extension of the file this conversion produces.
    pub fn extension(&self) -> &'static str {
        match self {
            ConversionType::PdfToExcel => "xlsx",
            ConversionType::PdfToWord => "docx",
            ConversionType::PdfToText => "txt",
            ConversionType::ScannedToSearchable => "searchable.pdf",
            ConversionType::InvoiceToTable => "invoice.xlsx",
        }
    }
}

impl FromStr for ConversionType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FolioError::UnknownConversion(s.to_string()))
    }
}

impl fmt::Display for ConversionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub kind: ConversionType,
    pub input: PathBuf,
    /// Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(kind: ConversionType, input: impl Into<PathBuf>) -> Self {
        ConversionRequest {
            kind,
            input: input.into(),
            output_dir: None,
        }
    }

    /// `<dir>/<stem>.<ext>` for this request.
    pub fn output_path(&self) -> PathBuf {
        output_path(&self.input, self.output_dir.as_deref(), self.kind.extension())
    }
}

pub fn output_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.{extension}"))
}

/// External collaborators a conversion may need.
pub struct Backends<'a> {
    pub extractor: &'a dyn PdfExtractor,
    pub ocr: &'a dyn OcrEngine,
}

/// Run one conversion, reporting progress into `tracker`.
///
/// Any fatal error is also reported as an error event before it is returned.
pub fn convert(
    request: &ConversionRequest,
    backends: &Backends<'_>,
    config: &LayoutConfig,
    tracker: &mut ProgressTracker,
) -> Result<Conversion, FolioError> {
    tracing::info!(
        kind = %request.kind,
        input = %request.input.display(),
        extractor = backends.extractor.backend_name(),
        "starting conversion"
    );
    tracker.processing(0, "Starting conversion...");

    let result = match request.kind {
        ConversionType::PdfToExcel => layout::to_sheets(&request.input, backends.extractor, config, tracker),
        ConversionType::PdfToWord => layout::to_document(&request.input, backends.extractor, config, tracker),
        ConversionType::PdfToText => layout::to_text(&request.input, backends.extractor, config, tracker),
        ConversionType::ScannedToSearchable => searchable::to_searchable(&request.input, backends, config, tracker),
        ConversionType::InvoiceToTable => invoice::to_invoice(&request.input, backends.extractor, config, tracker),
    };

    match result {
        Ok(output) => {
            let output_path = request.output_path();
            tracing::info!(output = %output_path.display(), "conversion complete");
            Ok(Conversion {
                input: request.input.clone(),
                output_path,
                output,
            })
        }
        Err(e) => {
            tracing::error!("conversion failed: {e}");
            tracker.error(e.to_string());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conversion_types() {
        for t in ConversionType::ALL {
            assert_eq!(t.as_str().parse::<ConversionType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_conversion_type() {
        let err = "pdf-to-pptx".parse::<ConversionType>().unwrap_err();
        assert!(matches!(err, FolioError::UnknownConversion(ref s) if s == "pdf-to-pptx"));
        assert!(err.to_string().contains("pdf-to-excel"));
    }

    #[test]
    fn test_output_path_defaults_to_input_dir() {
        let req = ConversionRequest::new(ConversionType::InvoiceToTable, "/data/in/bill.pdf");
        assert_eq!(req.output_path(), PathBuf::from("/data/in/bill.invoice.xlsx"));
    }

    #[test]
    fn test_output_path_with_dir() {
        let mut req = ConversionRequest::new(ConversionType::ScannedToSearchable, "/data/scan.pdf");
        req.output_dir = Some(PathBuf::from("/out"));
        assert_eq!(req.output_path(), PathBuf::from("/out/scan.searchable.pdf"));
    }
}
