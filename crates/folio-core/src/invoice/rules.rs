use regex::Regex;

/// One pattern for one invoice field, with the confidence its hits carry.
///
/// The value is taken from the group named `value`, or capture group 1 when
/// there is none. A hit in which the group named `veto` took part is skipped.
#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub confidence: f32,
    pattern: Regex,
}

impl FieldRule {
    /// Build a rule from a pattern literal.
    ///
    /// Panics on an invalid pattern; rules are compiled once from constants.
    pub fn new(name: &'static str, pattern: &str, confidence: f32) -> Self {
        let pattern =
            Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern for rule '{name}': {e}"));
        FieldRule {
            name,
            confidence,
            pattern,
        }
    }

    /// First capture in `text` that `accept` turns into a value.
    pub fn find<T>(&self, text: &str, accept: impl Fn(&str) -> Option<T>) -> Option<T> {
        self.pattern
            .captures_iter(text)
            .filter(|caps| caps.name("veto").is_none())
            .filter_map(|caps| caps.name("value").or_else(|| caps.get(1)))
            .find_map(|m| accept(m.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch<T> {
    pub value: T,
    pub confidence: f32,
    pub rule: &'static str,
}

/// Evaluate every rule and keep the highest-confidence hit.
///
/// Ties go to the rule listed first.
pub fn best_match<T>(
    rules: &[FieldRule],
    text: &str,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<FieldMatch<T>> {
    let mut best: Option<FieldMatch<T>> = None;
    for rule in rules {
        let Some(value) = rule.find(text, &accept) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| rule.confidence > b.confidence) {
            best = Some(FieldMatch {
                value,
                confidence: rule.confidence,
                rule: rule.name,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keep(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_highest_confidence_wins() {
        let rules = [
            FieldRule::new("weak", r"ref (\w+)", 0.3),
            FieldRule::new("strong", r"id (\w+)", 0.9),
        ];
        let hit = best_match(&rules, "ref abc id xyz", keep).unwrap();
        assert_eq!(hit.value, "xyz");
        assert_eq!(hit.rule, "strong");
        assert_eq!(hit.confidence, 0.9);
    }

    #[test]
    fn test_tie_goes_to_first_rule() {
        let rules = [
            FieldRule::new("first", r"a(\d)", 0.5),
            FieldRule::new("second", r"b(\d)", 0.5),
        ];
        assert_eq!(best_match(&rules, "b2 a1", keep).unwrap().rule, "first");
    }

    #[test]
    fn test_rejected_capture_tries_next_occurrence() {
        let rule = FieldRule::new("num", r"no\. (\w+)", 1.0);
        let digits = |s: &str| s.chars().any(|c| c.is_ascii_digit()).then(|| s.to_string());
        assert_eq!(rule.find("no. abc, no. a42", digits), Some("a42".to_string()));
    }

    #[test]
    fn test_vetoed_hit_is_skipped() {
        let rule = FieldRule::new("total", r"(?P<veto>sub )?total (?P<value>\d+)", 1.0);
        assert_eq!(rule.find("sub total 5, total 7", keep), Some("7".to_string()));
        assert_eq!(rule.find("sub total 5", keep), None);
    }

    #[test]
    fn test_no_hits() {
        let rules = [FieldRule::new("x", r"x(\d)", 1.0)];
        assert!(best_match(&rules, "nothing here", keep).is_none());
    }
}
