use crate::error::FolioError;
use crate::model::{OcrBBox, OcrWord};
use crate::ocr::{mean_confidence, OcrEngine, OcrPage, OcrSession, PageSelector};
use crate::tool;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// OCR backend that rasterizes with `pdftoppm` (poppler) and recognizes with
/// the `tesseract` CLI in TSV mode.
pub struct TesseractEngine {
    pub dpi: u32,
    pub language: String,
}

impl TesseractEngine {
    pub fn new(language: impl Into<String>) -> Self {
        TesseractEngine {
            dpi: 300,
            language: language.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn acquire(&self) -> Result<Box<dyn OcrSession>, FolioError> {
        let workdir = tempfile::Builder::new().prefix("folio-ocr-").tempdir()?;
        tracing::debug!(dir = %workdir.path().display(), "acquired OCR session");
        Ok(Box::new(TesseractSession {
            dpi: self.dpi,
            language: self.language.clone(),
            workdir,
        }))
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

/// Holds the scratch directory for rendered pages until dropped.
pub struct TesseractSession {
    dpi: u32,
    language: String,
    workdir: TempDir,
}

impl TesseractSession {
    fn render(&self, pdf: &Path, selector: PageSelector) -> Result<Vec<PathBuf>, FolioError> {
        let prefix = self.workdir.path().join("page");
        let mut cmd = Command::new("pdftoppm");
        cmd.arg("-r").arg(self.dpi.to_string()).arg("-png");
        if let PageSelector::Page(n) = selector {
            cmd.arg("-f")
                .arg(n.to_string())
                .arg("-l")
                .arg(n.to_string())
                .arg("-singlefile");
        }
        cmd.arg(pdf).arg(&prefix);
        tool::run("pdftoppm", &mut cmd)?;

        let mut images: Vec<PathBuf> = std::fs::read_dir(self.workdir.path())?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|x| x == "png"))
            .collect();
        images.sort();
        if images.is_empty() {
            return Err(FolioError::Ocr(format!(
                "pdftoppm produced no image for {selector:?}"
            )));
        }
        Ok(images)
    }

    fn clear_images(&self) -> Result<(), FolioError> {
        for entry in std::fs::read_dir(self.workdir.path())? {
            std::fs::remove_file(entry?.path())?;
        }
        Ok(())
    }
}

impl OcrSession for TesseractSession {
    fn recognize(&mut self, pdf: &Path, selector: PageSelector) -> Result<OcrPage, FolioError> {
        self.clear_images()?;
        let images = self.render(pdf, selector)?;

        // Tesseract reads a multi-image job from a list file.
        let input = if images.len() == 1 {
            images[0].clone()
        } else {
            let list = self.workdir.path().join("pages.txt");
            let body: Vec<String> = images.iter().map(|p| p.display().to_string()).collect();
            std::fs::write(&list, body.join("\n"))?;
            list
        };

        let output = tool::run(
            "tesseract",
            Command::new("tesseract")
                .arg(&input)
                .arg("stdout")
                .arg("-l")
                .arg(&self.language)
                .arg("tsv"),
        )?;
        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Drop for TesseractSession {
    fn drop(&mut self) {
        tracing::debug!(dir = %self.workdir.path().display(), "released OCR session");
    }
}

const LEVEL_PAGE: &str = "1";
const LEVEL_WORD: &str = "5";

/// Parse tesseract TSV output.
///
/// Only the first page of a multi-page job is kept: its words and image
/// size are returned, later pages are ignored.
pub fn parse_tsv(tsv: &str) -> Result<OcrPage, FolioError> {
    let mut lines = tsv.lines();
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| FolioError::Ocr("empty tesseract output".into()))?
        .split('\t')
        .collect();
    let col = |name: &str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| FolioError::Ocr(format!("tesseract TSV lacks '{name}' column")))
    };
    let (level, page, block, par, line) = (
        col("level")?,
        col("page_num")?,
        col("block_num")?,
        col("par_num")?,
        col("line_num")?,
    );
    let (left, top, width, height) = (col("left")?, col("top")?, col("width")?, col("height")?);
    let (conf, text_col) = (col("conf")?, col("text")?);

    let num = |fields: &[&str], i: usize| -> f32 {
        fields.get(i).and_then(|v| v.trim().parse().ok()).unwrap_or(0.0)
    };

    let mut image_size: Option<(f32, f32)> = None;
    let mut words = Vec::new();
    let mut text = String::new();
    let mut last_line: Option<(&str, &str, &str)> = None;

    for row in lines {
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.get(page).copied() != Some("1") {
            continue;
        }
        match fields.get(level).copied() {
            Some(LEVEL_PAGE) if image_size.is_none() => {
                image_size = Some((num(&fields, width), num(&fields, height)));
            }
            Some(LEVEL_WORD) => {
                let word = fields.get(text_col).map(|t| t.trim()).unwrap_or("");
                let confidence = num(&fields, conf);
                if word.is_empty() || confidence < 0.0 {
                    continue;
                }
                let at = |i: usize| fields.get(i).copied().unwrap_or("");
                let key = (at(block), at(par), at(line));
                match last_line {
                    Some(prev) if prev == key => text.push(' '),
                    Some(_) => text.push('\n'),
                    None => {}
                }
                last_line = Some(key);
                text.push_str(word);

                let (x0, y0) = (num(&fields, left), num(&fields, top));
                words.push(OcrWord {
                    text: word.to_string(),
                    bbox: OcrBBox {
                        x0,
                        y0,
                        x1: x0 + num(&fields, width),
                        y1: y0 + num(&fields, height),
                    },
                    confidence,
                });
            }
            _ => {}
        }
    }

    let (image_width, image_height) =
        image_size.ok_or_else(|| FolioError::Ocr("tesseract output has no page row".into()))?;
    Ok(OcrPage {
        confidence: mean_confidence(&words),
        text,
        words,
        image_width,
        image_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t2550\t3300\t-1\t
2\t1\t1\t0\t0\t0\t100\t100\t800\t120\t-1\t
5\t1\t1\t1\t1\t1\t100\t100\t300\t50\t96.5\tAcme
5\t1\t1\t1\t1\t2\t420\t100\t250\t50\t93.5\tCorp
5\t1\t1\t1\t2\t1\t100\t180\t200\t50\t80\tTotal
5\t1\t1\t1\t2\t2\t320\t180\t10\t50\t-1\t
1\t2\t0\t0\t0\t0\t0\t0\t2550\t3300\t-1\t
5\t2\t1\t1\t1\t1\t100\t100\t300\t50\t99\tIgnored
";

    #[test]
    fn test_parse_tsv_words() {
        let page = parse_tsv(TSV).unwrap();
        assert_eq!(page.image_width, 2550.0);
        assert_eq!(page.image_height, 3300.0);
        assert_eq!(page.words.len(), 3);
        assert_eq!(page.text, "Acme Corp\nTotal");
        let corp = &page.words[1];
        assert_eq!(corp.bbox, OcrBBox { x0: 420.0, y0: 100.0, x1: 670.0, y1: 150.0 });
        assert!((page.confidence - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_parse_tsv_missing_columns() {
        assert!(matches!(parse_tsv("level\ttext\n"), Err(FolioError::Ocr(_))));
        assert!(matches!(parse_tsv(""), Err(FolioError::Ocr(_))));
    }

    #[test]
    fn test_parse_tsv_blank_page() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t100\t200\t-1\t\n";
        let page = parse_tsv(tsv).unwrap();
        assert!(page.words.is_empty());
        assert_eq!(page.confidence, 0.0);
        assert_eq!(page.text, "");
    }
}
