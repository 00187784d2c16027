//! The highlighting engine
//!
//! A `Highlighter` is an append-only list of rules. Highlighting a line runs
//! every rule in registration order and concatenates their spans, so a later
//! rule's span lands after an earlier one and is painted on top of it.

use super::rules::{HighlightError, Rule};
use super::style::{Span, Style};

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    rules: Vec<Rule>,
}

impl Highlighter {
    /// Create an engine with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compile `pattern` and append it with `style`
    pub fn register(&mut self, pattern: &str, style: Style) -> Result<(), HighlightError> {
        let rule = Rule::new(pattern, style)?;
        tracing::trace!(pattern = rule.pattern(), "registered highlight rule");
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Highlight a single line of text
    ///
    /// Spans come out grouped by rule in registration order, and within a
    /// rule from left to right.
    pub fn highlight(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            rule.spans_into(text, &mut spans);
        }
        spans
    }
}
