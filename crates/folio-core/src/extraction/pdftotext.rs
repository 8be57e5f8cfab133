use crate::error::FolioError;
use crate::extraction::PdfExtractor;
use crate::model::{Document, Page, TextFragment};
use crate::tool;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox`, which reports every word with its bounding box in
/// top-left-origin page points. Boxes are flipped into the bottom-left
/// convention of [`TextFragment`].
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_document(&self, path: &Path) -> Result<Document, FolioError> {
        let output = tool::run(
            "pdftotext",
            Command::new("pdftotext")
                .arg("-bbox")
                .arg("-enc")
                .arg("UTF-8")
                .arg(path)
                .arg("-"),
        )?;

        let xml = String::from_utf8_lossy(&output.stdout);
        let document = parse_bbox_xml(&xml)?;
        tracing::debug!(
            pages = document.num_pages,
            path = %path.display(),
            "extracted positioned text"
        );
        Ok(document)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

struct WordBox {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

fn attr_f32(e: &BytesStart, name: &[u8]) -> Option<f32> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8_lossy(&a.value).trim().parse().ok())
}

fn word_box(e: &BytesStart) -> Option<WordBox> {
    Some(WordBox {
        x_min: attr_f32(e, b"xMin")?,
        y_min: attr_f32(e, b"yMin")?,
        x_max: attr_f32(e, b"xMax")?,
        y_max: attr_f32(e, b"yMax")?,
    })
}

/// Parse the XHTML produced by `pdftotext -bbox` into a [`Document`].
pub fn parse_bbox_xml(xml: &str) -> Result<Document, FolioError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Page> = Vec::new();
    let mut page_size: Option<(f32, f32)> = None;
    let mut fragments: Vec<TextFragment> = Vec::new();
    let mut word: Option<(WordBox, String)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    let width = attr_f32(&e, b"width").unwrap_or(0.0);
                    let height = attr_f32(&e, b"height").unwrap_or(0.0);
                    page_size = Some((width, height));
                    fragments.clear();
                }
                b"word" => word = word_box(&e).map(|b| (b, String::new())),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"page" => {
                let width = attr_f32(&e, b"width").unwrap_or(0.0);
                let height = attr_f32(&e, b"height").unwrap_or(0.0);
                pages.push(Page::new(pages.len() + 1, width, height, Vec::new()));
            }
            Ok(Event::Text(e)) => {
                if let Some((_, text)) = word.as_mut() {
                    match e.unescape() {
                        Ok(s) => text.push_str(&s),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"word" => {
                    if let (Some((b, text)), Some((_, page_h))) = (word.take(), page_size) {
                        let text = text.trim();
                        if !text.is_empty() {
                            fragments.push(TextFragment::new(
                                text,
                                b.x_min,
                                page_h - b.y_max,
                                b.x_max - b.x_min,
                                b.y_max - b.y_min,
                            ));
                        }
                    }
                }
                b"page" => {
                    if let Some((width, height)) = page_size.take() {
                        let index = pages.len() + 1;
                        pages.push(Page::new(index, width, height, std::mem::take(&mut fragments)));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FolioError::Extraction(format!(
                    "malformed pdftotext output at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(Document::new(pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="pdfTeX"/>
</head>
<body>
<doc>
  <page width="612.000000" height="792.000000">
    <word xMin="72.000000" yMin="90.000000" xMax="130.000000" yMax="102.000000">Acme</word>
    <word xMin="134.000000" yMin="90.000000" xMax="170.000000" yMax="102.000000">Corp</word>
    <word xMin="72.000000" yMin="110.000000" xMax="120.000000" yMax="122.000000">R&amp;D</word>
  </page>
  <page width="612.000000" height="792.000000">
  </page>
</doc>
</body>
</html>
"#;

    #[test]
    fn test_parse_pages_and_words() {
        let doc = parse_bbox_xml(SAMPLE).unwrap();
        assert_eq!(doc.num_pages, 2);
        let page = &doc.pages[0];
        assert_eq!(page.index, 1);
        assert_eq!(page.width, 612.0);
        assert_eq!(page.fragments.len(), 3);
        assert_eq!(page.full_text, "Acme Corp R&D");
        assert!(doc.pages[1].fragments.is_empty());
        assert_eq!(doc.pages[1].index, 2);
    }

    #[test]
    fn test_coordinates_flipped_to_bottom_left() {
        let doc = parse_bbox_xml(SAMPLE).unwrap();
        let acme = &doc.pages[0].fragments[0];
        assert_eq!(acme.x, 72.0);
        assert_eq!(acme.y, 792.0 - 102.0);
        assert_eq!(acme.width, 58.0);
        assert_eq!(acme.height, 12.0);
    }

    #[test]
    fn test_empty_document() {
        let doc = parse_bbox_xml("<doc></doc>").unwrap();
        assert_eq!(doc.num_pages, 0);
    }

    #[test]
    fn test_malformed_output_is_error() {
        let err = parse_bbox_xml("<doc><page width=\"1\" height=\"1\"></word></doc>").unwrap_err();
        assert!(matches!(err, FolioError::Extraction(_)));
    }
}
