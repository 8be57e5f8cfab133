use crate::invoice::amounts::parse_amount;
use crate::invoice::rules::{best_match, FieldMatch, FieldRule};
use crate::model::{Currency, LineItem};
use std::sync::LazyLock;
use regex::Regex;

pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

const VENDOR_CONFIDENCE: f32 = 0.7;

static INVOICE_NUMBER_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::new("invoice", r"(?i)invoice\s*#?\s*:?\s*([A-Z0-9-]+)", 0.9),
        FieldRule::new("inv", r"(?i)inv\s*#?\s*:?\s*([A-Z0-9-]+)", 0.8),
        FieldRule::new("receipt", r"(?i)receipt\s*#?\s*:?\s*([A-Z0-9-]+)", 0.75),
        FieldRule::new("order", r"(?i)order\s*#?\s*:?\s*([A-Z0-9-]+)", 0.6),
        FieldRule::new("hash", r"(?i)#\s*([A-Z0-9-]+)", 0.4),
    ]
});

static CODE_WORDS: LazyLock<Vec<(Currency, Regex)>> = LazyLock::new(|| {
    [
        (Currency::Usd, "usd"),
        (Currency::Eur, "eur"),
        (Currency::Gbp, "gbp"),
        (Currency::Jpy, "jpy"),
        (Currency::Cad, "cad"),
    ]
    .into_iter()
    // Bounded by non-letters only, so codes glued to amounts still count.
    .map(|(currency, code)| {
        let pattern = format!(r"(?i)(?:^|[^a-z]){code}(?:[^a-z]|$)");
        (currency, Regex::new(&pattern).unwrap())
    })
    .collect()
});

static LINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(\d+)\s+[$€£¥]?([\d,]+\.?\d*)\s+[$€£¥]?([\d,]+\.?\d*)$").unwrap()
});

/// Pick the vendor from the first few non-blank lines.
///
/// Lines mentioning "invoice" or "receipt", starting with a digit, or shorter
/// than three characters are skipped.
pub fn extract_vendor(text: &str, scan_lines: usize) -> Option<FieldMatch<String>> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(scan_lines)
        .find(|line| {
            let lower = line.to_lowercase();
            let len = line.chars().count();
            !lower.contains("invoice")
                && !lower.contains("receipt")
                && !line.starts_with(|c: char| c.is_ascii_digit())
                && (3..100).contains(&len)
        })
        .map(|line| FieldMatch {
            value: line.to_string(),
            confidence: VENDOR_CONFIDENCE,
            rule: "leading_line",
        })
}

/// First identifier captured by the first matching pattern.
///
/// Letters-only identifiers are kept, so a label word directly after
/// "Invoice" (as in "Invoice Date") is read as the number when it comes first.
pub fn extract_invoice_number(text: &str) -> Option<FieldMatch<String>> {
    best_match(&INVOICE_NUMBER_RULES, text, |raw| {
        let id = raw.trim();
        (!id.is_empty()).then(|| id.to_string())
    })
}

/// Detect the currency by symbol or ISO code, in USD, EUR, GBP, JPY, CAD
/// priority order. Defaults to USD.
pub fn detect_currency(text: &str) -> Currency {
    let symbols = [
        (Currency::Usd, Some('$')),
        (Currency::Eur, Some('€')),
        (Currency::Gbp, Some('£')),
        (Currency::Jpy, Some('¥')),
        (Currency::Cad, None),
    ];

    for ((currency, symbol), (_, code)) in symbols.iter().zip(CODE_WORDS.iter()) {
        let by_symbol = symbol.map_or(false, |s| text.contains(s));
        if by_symbol || code.is_match(text) {
            return *currency;
        }
    }
    Currency::default()
}

/// Lines shaped `<description> <qty> <unit price> <total>`.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    text.lines()
        .filter_map(|line| {
            let caps = LINE_ITEM.captures(line.trim_end())?;
            let quantity = caps[2].parse::<u64>().ok()?;
            Some(LineItem {
                description: caps[1].trim().to_string(),
                quantity,
                unit_price: parse_amount(&caps[3]),
                total: parse_amount(&caps[4]),
            })
        })
        .collect()
}
