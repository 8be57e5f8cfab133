use folio_core::config::builtin::load_preset;
use folio_core::config::load_config;
use folio_core::error::FolioError;
use folio_core::extraction::pdftotext::PdftotextExtractor;
use folio_core::ocr::tesseract::TesseractEngine;
use folio_core::progress::ProgressTracker;
use folio_core::{convert, Backends, ConversionRequest, ConversionType};
use std::path::PathBuf;

use crate::output;

pub struct ConvertArgs {
    pub kind: String,
    pub input_file: PathBuf,
    pub output_format: String,
    pub save: bool,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub lang: String,
    pub progress: bool,
}

pub fn run(args: ConvertArgs) -> Result<(), FolioError> {
    // Reject the request before touching the file.
    let kind: ConversionType = args.kind.parse()?;

    let config = match (&args.config, &args.preset) {
        (Some(path), _) => load_config(path)?,
        (None, Some(name)) => load_preset(name)?,
        (None, None) => load_preset("default")?,
    };

    let extractor = PdftotextExtractor::new();
    let ocr = TesseractEngine::new(args.lang);
    let backends = Backends {
        extractor: &extractor,
        ocr: &ocr,
    };

    let mut request = ConversionRequest::new(kind, args.input_file);
    request.output_dir = args.out_dir;

    let mut tracker = ProgressTracker::new();
    let result = convert(&request, &backends, &config, &mut tracker);
    if args.progress {
        for event in tracker.drain() {
            eprintln!("[{:>3}%] {}", event.progress, event.message);
        }
    }
    let conversion = result?;

    if args.save {
        let mut path = request.output_path().into_os_string();
        path.push(".json");
        let path = PathBuf::from(path);
        std::fs::write(&path, output::json::render(&conversion)?)?;
        eprintln!("Written to {}", path.display());
        return Ok(());
    }

    let rendered = match args.output_format.as_str() {
        "json" => output::json::render(&conversion)?,
        _ => output::text::render(&conversion),
    };
    println!("{rendered}");
    Ok(())
}
