//! Pattern rules for syntax highlighting
//!
//! A rule pairs a regex with the style painted over its single capturing
//! group. The group, not the whole match, decides the styled region.

use regex::Regex;
use thiserror::Error;

use super::style::{Span, Style};

/// Errors raised while building a rule set
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("invalid highlight pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("highlight pattern `{pattern}` must have exactly one capturing group, found {found}")]
    CaptureGroupCount { pattern: String, found: usize },
}

/// A single-line pattern rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Compiled regex pattern
    pattern: Regex,
    /// Style painted over the capturing group
    style: Style,
}

impl Rule {
    /// Compile a rule, requiring exactly one capturing group
    pub fn new(pattern: &str, style: Style) -> Result<Self, HighlightError> {
        let regex = Regex::new(pattern).map_err(|source| HighlightError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        // captures_len counts the implicit whole-match group
        let found = regex.captures_len() - 1;
        if found != 1 {
            return Err(HighlightError::CaptureGroupCount {
                pattern: pattern.to_string(),
                found,
            });
        }

        Ok(Self { pattern: regex, style })
    }

    /// The source text of the pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Append one span per non-overlapping match in `text`
    ///
    /// A group that did not participate in a match yields a zero-length
    /// span at the start of that match.
    pub fn spans_into(&self, text: &str, spans: &mut Vec<Span>) {
        for caps in self.pattern.captures_iter(text) {
            let span = match caps.get(1) {
                Some(group) => Span::new(group.start(), group.end(), self.style),
                None => {
                    let at = caps.get(0).map_or(0, |m| m.start());
                    Span::new(at, at, self.style)
                }
            };
            spans.push(span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_spans() {
        let rule = Rule::new(r"(\d+)", Style::default()).unwrap();
        let mut spans = Vec::new();
        rule.spans_into("abc 123 def 45", &mut spans);
        let ranges: Vec<_> = spans.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(4, 7), (12, 14)]);
    }

    #[test]
    fn test_group_not_whole_match() {
        let rule = Rule::new(r"key=(\w+)", Style::default()).unwrap();
        let mut spans = Vec::new();
        rule.spans_into("key=value", &mut spans);
        assert_eq!(spans, vec![Span::new(4, 9, Style::default())]);
    }

    #[test]
    fn test_non_participating_group() {
        let rule = Rule::new(r"x(y)?", Style::default()).unwrap();
        let mut spans = Vec::new();
        rule.spans_into("ab x", &mut spans);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, spans[0].end);
        assert_eq!(spans[0].start, 3);
    }

    #[test]
    fn test_no_group_rejected() {
        let err = Rule::new(r"\d+", Style::default()).unwrap_err();
        assert!(matches!(err, HighlightError::CaptureGroupCount { found: 0, .. }));
    }

    #[test]
    fn test_two_groups_rejected() {
        let err = Rule::new(r"(a)(b)", Style::default()).unwrap_err();
        assert!(matches!(err, HighlightError::CaptureGroupCount { found: 2, .. }));
    }

    #[test]
    fn test_non_capturing_groups_allowed() {
        let rule = Rule::new(r"(?:a|b)(c)(?:$|\s)", Style::default()).unwrap();
        assert_eq!(rule.pattern(), r"(?:a|b)(c)(?:$|\s)");
    }

    #[test]
    fn test_invalid_syntax_rejected() {
        let err = Rule::new(r"([A-Z", Style::default()).unwrap_err();
        assert!(matches!(err, HighlightError::InvalidPattern { .. }));
        assert!(err.to_string().contains("([A-Z"));
    }
}
