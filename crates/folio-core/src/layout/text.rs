use std::sync::LazyLock;
use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:Page|Pg\.?)\s*\d+\s*(?:of\s*\d+)?\b").unwrap());
static BARE_NUMBER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\s*$").unwrap());
static DOUBLE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"  +").unwrap());

/// Clean one page of text for plain-text export.
///
/// Collapses whitespace, strips "Page N of M" style markers and lines holding
/// only a number, and prefixes a `--- Page N ---` marker when the document
/// has more than one page.
pub fn clean_page_text(text: &str, page_number: usize, total_pages: usize) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let unmarked = PAGE_MARKER.replace_all(&collapsed, "");
    let no_numbers = BARE_NUMBER_LINE.replace_all(&unmarked, "");
    let cleaned = DOUBLE_SPACE.replace_all(&no_numbers, " ");
    let cleaned = cleaned.trim();

    if total_pages > 1 {
        format!("--- Page {} ---\n{}", page_number, cleaned)
    } else {
        cleaned.to_string()
    }
}
