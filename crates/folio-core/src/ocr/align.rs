use crate::config::schema::LayoutConfig;
use crate::error::FolioError;
use crate::model::{OcrWord, Opacity, PlacedGlyph};

/// Page vector size alongside the size of the image OCR ran on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub image_width: f32,
    pub image_height: f32,
}

impl PageGeometry {
    fn scale(&self) -> (f32, f32) {
        (
            self.page_width / self.image_width,
            self.page_height / self.image_height,
        )
    }
}

/// Receives invisible glyph placements for one page.
pub trait GlyphSink {
    /// Place a glyph. A rejected glyph leaves the sink unchanged.
    fn place(&mut self, glyph: PlacedGlyph) -> Result<(), FolioError>;
}

/// Map one OCR word from image pixels into page space.
///
/// Image Y grows downward and page Y grows upward, so the bottom edge of the
/// box becomes the glyph baseline. Blank words map to nothing.
pub fn map_word(word: &OcrWord, geometry: &PageGeometry, config: &LayoutConfig) -> Option<PlacedGlyph> {
    let text = word.text.trim();
    if text.is_empty() {
        return None;
    }
    let (scale_x, scale_y) = geometry.scale();
    let b = &word.bbox;
    let font_size = ((b.y1 - b.y0) * scale_y * config.font_scale)
        .clamp(config.min_font_size, config.max_font_size);

    Some(PlacedGlyph {
        text: text.to_string(),
        x: b.x0 * scale_x,
        y: geometry.page_height - b.y1 * scale_y,
        font_size,
        opacity: Opacity::TRANSPARENT,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayReport {
    pub placed: usize,
    pub skipped: usize,
}

/// Push every non-blank word into `sink`.
///
/// A word the sink refuses is skipped and counted; the rest of the page
/// still gets its layer.
pub fn overlay_words(
    words: &[OcrWord],
    geometry: &PageGeometry,
    config: &LayoutConfig,
    sink: &mut dyn GlyphSink,
) -> Result<OverlayReport, FolioError> {
    if !(geometry.image_width > 0.0 && geometry.image_height > 0.0) {
        return Err(FolioError::Ocr(format!(
            "OCR image has no area ({}x{})",
            geometry.image_width, geometry.image_height
        )));
    }

    let mut report = OverlayReport::default();
    for glyph in words.iter().filter_map(|w| map_word(w, geometry, config)) {
        match sink.place(glyph) {
            Ok(()) => report.placed += 1,
            Err(e) => {
                tracing::debug!("skipping glyph: {e}");
                report.skipped += 1;
            }
        }
    }
    if report.skipped > 0 {
        tracing::warn!(
            skipped = report.skipped,
            placed = report.placed,
            "some OCR words could not be placed"
        );
    }
    Ok(report)
}

/// Whether `c` has a code point in the WinAnsi (Windows-1252) encoding used
/// by the standard Helvetica font.
pub fn is_winansi(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}')
        || "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ".contains(c)
}

/// In-memory text layer that only accepts WinAnsi-encodable glyphs.
#[derive(Debug, Default)]
pub struct TextLayer {
    glyphs: Vec<PlacedGlyph>,
}

impl TextLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyphs(&self) -> &[PlacedGlyph] {
        &self.glyphs
    }

    pub fn into_glyphs(self) -> Vec<PlacedGlyph> {
        self.glyphs
    }
}

impl GlyphSink for TextLayer {
    fn place(&mut self, glyph: PlacedGlyph) -> Result<(), FolioError> {
        if let Some(bad) = glyph.text.chars().find(|c| !is_winansi(*c)) {
            return Err(FolioError::GlyphRejected {
                text: glyph.text,
                reason: format!("'{bad}' is not WinAnsi-encodable"),
            });
        }
        self.glyphs.push(glyph);
        Ok(())
    }
}
