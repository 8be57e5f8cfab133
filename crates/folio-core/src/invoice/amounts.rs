use crate::invoice::rules::{best_match, FieldMatch, FieldRule};
use std::sync::LazyLock;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static TOTAL_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::new(
            "grand_total",
            r"(?i)grand\s*total[:\s]*[$€£¥]?\s*([\d,]+\.?\d*)",
            0.95,
        ),
        FieldRule::new(
            "amount_due",
            r"(?i)amount\s*due[:\s]*[$€£¥]?\s*([\d,]+\.?\d*)",
            0.9,
        ),
        // Subtotal spellings are matched and vetoed so the scan moves past them.
        FieldRule::new(
            "total",
            r"(?i)(?:^|[^\w-])(?P<veto>sub[\s-]*)?total[:\s]*[$€£¥]?\s*(?P<value>[\d,]+\.?\d*)",
            0.8,
        ),
    ]
});

static SUBTOTAL_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "subtotal",
        r"(?i)(?:subtotal|sub-total|sub\s*total)[:\s]*[$€£¥]?\s*([\d,]+\.?\d*)",
        0.9,
    )]
});

static TAX_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![FieldRule::new(
        "tax",
        r"(?i)\b(?:tax|vat|gst|hst)[:\s]*[$€£¥]?\s*([\d,]+\.?\d*)",
        0.85,
    )]
});

static AMOUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$€£¥]?\s*[\d,]+\.?\d*").unwrap());

/// Confidence attached to a total inferred from the largest amount in the text.
pub const FALLBACK_TOTAL_CONFIDENCE: f32 = 0.3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amounts {
    pub subtotal: Option<FieldMatch<Decimal>>,
    pub tax: Option<FieldMatch<Decimal>>,
    pub total: Option<FieldMatch<Decimal>>,
}

/// Parse a monetary string, ignoring thousands separators, currency symbols
/// and whitespace. Anything unparseable is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | '¥') && !c.is_whitespace())
        .collect();
    Decimal::from_str(cleaned.trim_end_matches('.')).unwrap_or(Decimal::ZERO)
}

fn labelled(rules: &[FieldRule], text: &str) -> Option<FieldMatch<Decimal>> {
    best_match(rules, text, |raw| {
        let amount = parse_amount(raw);
        (amount > Decimal::ZERO).then_some(amount)
    })
}

/// Largest positive currency-like number anywhere in the text.
pub fn largest_amount(text: &str) -> Option<Decimal> {
    AMOUNT_TOKEN
        .find_iter(text)
        .map(|m| parse_amount(m.as_str()))
        .filter(|a| *a > Decimal::ZERO)
        .max()
}

/// Recover subtotal, tax and total.
///
/// Without a labelled total, the largest amount in the text stands in for it.
pub fn extract_amounts(text: &str) -> Amounts {
    let total = labelled(&TOTAL_RULES, text).or_else(|| {
        largest_amount(text).map(|value| FieldMatch {
            value,
            confidence: FALLBACK_TOTAL_CONFIDENCE,
            rule: "largest_amount",
        })
    });

    Amounts {
        subtotal: labelled(&SUBTOTAL_RULES, text),
        tax: labelled(&TAX_RULES, text),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn value(m: &Option<FieldMatch<Decimal>>) -> Decimal {
        m.as_ref().map(|m| m.value).unwrap_or(Decimal::ZERO)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56"), dec!(1234.56));
        assert_eq!(parse_amount("€ 99"), dec!(99));
        assert_eq!(parse_amount("12."), dec!(12));
        assert_eq!(parse_amount(","), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }

    #[test]
    fn test_labelled_amounts() {
        let text = "Total: $1,234.56\nSubtotal: $1,100.00\nTax: $134.56";
        let amounts = extract_amounts(text);
        assert_eq!(value(&amounts.total), dec!(1234.56));
        assert_eq!(value(&amounts.subtotal), dec!(1100.00));
        assert_eq!(value(&amounts.tax), dec!(134.56));
        assert_eq!(amounts.total.unwrap().rule, "total");
    }

    #[test]
    fn test_subtotal_is_not_mistaken_for_total() {
        let text = "Subtotal: 100.00\nSub-total 100.00\nTotal: 110.00";
        assert_eq!(value(&extract_amounts(text).total), dec!(110.00));

        let spaced = extract_amounts("Acme\nSub total: 100.00\nTotal: 110.00");
        assert_eq!(value(&spaced.total), dec!(110.00));
        assert_eq!(value(&spaced.subtotal), dec!(100.00));
    }

    #[test]
    fn test_only_subtotal_falls_back_to_largest_amount() {
        let amounts = extract_amounts("Sub total: 80.00\nShipping 12.50");
        let total = amounts.total.unwrap();
        assert_eq!(total.value, dec!(80.00));
        assert_eq!(total.rule, "largest_amount");
    }

    #[test]
    fn test_grand_total_outranks_total() {
        let text = "Total: 50.00\nGrand Total: 75.00";
        let total = extract_amounts(text).total.unwrap();
        assert_eq!(total.value, dec!(75.00));
        assert_eq!(total.rule, "grand_total");
    }

    #[test]
    fn test_vat_label() {
        assert_eq!(value(&extract_amounts("VAT: €20.00").tax), dec!(20.00));
    }

    #[test]
    fn test_fallback_to_largest_amount() {
        let text = "Widgets 3 x 12.50\nShipping 7.25\nPay 44.75 by Friday";
        let total = extract_amounts(text).total.unwrap();
        assert_eq!(total.value, dec!(44.75));
        assert_eq!(total.confidence, FALLBACK_TOTAL_CONFIDENCE);
    }

    #[test]
    fn test_no_numbers_no_total() {
        let amounts = extract_amounts("Thank you for your business");
        assert!(amounts.total.is_none());
        assert!(amounts.subtotal.is_none());
        assert!(amounts.tax.is_none());
    }
}
