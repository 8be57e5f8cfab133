use crate::invoice::rules::{best_match, FieldMatch, FieldRule};
use std::sync::LazyLock;
use regex::Regex;

const MONTHS: &str = "(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\\.?";

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b".to_string(),
        r"\b\d{4}[/\-]\d{1,2}[/\-]\d{1,2}\b".to_string(),
        format!(r"(?i)\b{MONTHS}\s+\d{{1,2}},?\s+\d{{4}}"),
        format!(r"(?i)\b\d{{1,2}}\s+{MONTHS}\s+\d{{4}}"),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static INVOICE_DATE_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "invoice_date_label",
        r"(?i)(?:invoice|receipt)\s*date[:\s]*([^\n]+)",
        0.9,
    )]
});

static DUE_DATE_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "due_date_label",
        r"(?i)due\s*(?:date)?[:\s]*([^\n]+)",
        0.9,
    )]
});

const FIRST_DATE_CONFIDENCE: f32 = 0.5;
const SECOND_DATE_CONFIDENCE: f32 = 0.4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dates {
    pub date: Option<FieldMatch<String>>,
    pub due_date: Option<FieldMatch<String>>,
}

/// Every date-shaped substring, de-duplicated.
///
/// Shapes are collected one after another: all day-first numeric dates, then
/// year-first, then month-name forms. Within a shape, text order holds.
pub fn find_dates(text: &str) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for found in DATE_PATTERNS.iter().flat_map(|re| re.find_iter(text)) {
        if !dates.iter().any(|d| d == found.as_str()) {
            dates.push(found.as_str().to_string());
        }
    }
    dates
}

/// A labelled remainder only yields a numeric day-first date.
fn first_date(remainder: &str) -> Option<String> {
    DATE_PATTERNS[0].find(remainder).map(|m| m.as_str().to_string())
}

/// Recover the invoice date and due date.
///
/// Labelled dates ("Invoice Date:", "Due:") take precedence; otherwise the
/// first and second dates found in the text are used.
pub fn extract_dates(text: &str) -> Dates {
    let found = find_dates(text);

    let date = best_match(&INVOICE_DATE_RULES, text, first_date).or_else(|| {
        found.first().map(|d| FieldMatch {
            value: d.clone(),
            confidence: FIRST_DATE_CONFIDENCE,
            rule: "first_date",
        })
    });

    let due_date = best_match(&DUE_DATE_RULES, text, first_date).or_else(|| {
        found.get(1).map(|d| FieldMatch {
            value: d.clone(),
            confidence: SECOND_DATE_CONFIDENCE,
            rule: "second_date",
        })
    });

    Dates { date, due_date }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(m: &Option<FieldMatch<String>>) -> &str {
        m.as_ref().map(|m| m.value.as_str()).unwrap_or("")
    }

    #[test]
    fn test_find_all_shapes() {
        let text = "Issued 01/15/2024, shipped 2024-01-20, paid March 3, 2024 or 4 Apr 2024";
        assert_eq!(
            find_dates(text),
            vec!["01/15/2024", "2024-01-20", "March 3, 2024", "4 Apr 2024"]
        );
    }

    #[test]
    fn test_iso_date_not_split() {
        assert_eq!(find_dates("Date: 2024-01-15"), vec!["2024-01-15"]);
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(find_dates("1/2/24 and again 1/2/24"), vec!["1/2/24"]);
    }

    #[test]
    fn test_month_inside_word_ignored() {
        assert!(find_dates("Summary 12, 2024").is_empty());
    }

    #[test]
    fn test_labelled_dates_win() {
        let text = "Printed 03/01/2024\nInvoice Date: 02/15/2024\nDue Date: 03/15/2024";
        let dates = extract_dates(text);
        assert_eq!(value(&dates.date), "02/15/2024");
        assert_eq!(value(&dates.due_date), "03/15/2024");
        assert_eq!(dates.date.unwrap().rule, "invoice_date_label");
    }

    #[test]
    fn test_due_label_without_date_is_skipped() {
        let text = "Amount Due: $500.00\n01/02/2024\n02/02/2024";
        let dates = extract_dates(text);
        assert_eq!(value(&dates.date), "01/02/2024");
        assert_eq!(value(&dates.due_date), "02/02/2024");
        assert_eq!(dates.due_date.unwrap().rule, "second_date");
    }

    #[test]
    fn test_dates_ordered_by_shape() {
        let text = "Shipped March 3, 2024 from 2024-02-28; invoiced 03/01/2024";
        assert_eq!(
            find_dates(text),
            vec!["03/01/2024", "2024-02-28", "March 3, 2024"]
        );
    }

    #[test]
    fn test_label_remainder_needs_numeric_date() {
        let text = "Invoice Date: March 3, 2024\nShipped 01/05/2024";
        let dates = extract_dates(text);
        assert_eq!(value(&dates.date), "01/05/2024");
        assert_eq!(dates.date.unwrap().rule, "first_date");
        assert_eq!(value(&dates.due_date), "March 3, 2024");
    }

    #[test]
    fn test_no_dates() {
        let dates = extract_dates("Nothing to see");
        assert!(dates.date.is_none());
        assert!(dates.due_date.is_none());
    }
}
