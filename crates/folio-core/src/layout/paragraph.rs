use crate::config::schema::LayoutConfig;
use crate::model::{Paragraph, TextFragment};

struct OpenLine {
    y: f32,
    text: String,
}

/// Merge consecutive fragments into lines.
///
/// A fragment joins the running line while its Y differs from the line's Y
/// by less than `threshold`; the line's Y follows the last fragment merged.
/// Lines made only of whitespace come back as empty strings and act as
/// paragraph breaks.
pub fn build_lines(fragments: &[TextFragment], threshold: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<OpenLine> = None;

    for fragment in fragments {
        match current.as_mut() {
            Some(line) if (fragment.y - line.y).abs() < threshold => {
                line.text.push_str(&fragment.text);
                line.text.push(' ');
                line.y = fragment.y;
            }
            _ => {
                if let Some(done) = current.take() {
                    lines.push(done.text.trim().to_string());
                }
                current = Some(OpenLine {
                    y: fragment.y,
                    text: format!("{} ", fragment.text),
                });
            }
        }
    }

    if let Some(done) = current {
        let text = done.text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    lines
}

/// Whether a line reads like a heading: short and all-caps, or short and
/// colon-terminated.
pub fn is_heading(line: &str, config: &LayoutConfig) -> bool {
    let len = line.chars().count();
    let shouting = len < config.heading_max_len
        && line == line.to_uppercase()
        && line.chars().any(|c| c.is_uppercase());
    let labelled = len < config.colon_heading_max_len && line.ends_with(':');
    shouting || labelled
}

/// Rebuild a page's paragraphs and headings from its fragments.
///
/// Never returns an empty sequence when `full_text` has visible content.
pub fn build_paragraphs(
    fragments: &[TextFragment],
    full_text: &str,
    config: &LayoutConfig,
) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut open = String::new();

    for line in build_lines(fragments, config.line_threshold) {
        if line.is_empty() {
            flush(&mut open, &mut paragraphs);
            continue;
        }

        if is_heading(&line, config) {
            flush(&mut open, &mut paragraphs);
            paragraphs.push(Paragraph::heading(line));
        } else {
            if !open.is_empty() {
                open.push(' ');
            }
            open.push_str(&line);
        }
    }
    flush(&mut open, &mut paragraphs);

    if paragraphs.is_empty() && !full_text.trim().is_empty() {
        paragraphs.push(Paragraph::body(full_text.trim()));
    }

    paragraphs
}

fn flush(open: &mut String, paragraphs: &mut Vec<Paragraph>) {
    if !open.is_empty() {
        paragraphs.push(Paragraph::body(std::mem::take(open)));
    }
}
