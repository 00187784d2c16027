//! Per-view line storage with a highlight cache
//!
//! Each displayed panel owns one `Document`. Changing a line drops only that
//! line's cached spans; the next lookup re-highlights it.

use super::highlighter::Highlighter;
use super::style::Span;

#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<String>,
    /// Cached spans per line (None = not computed)
    line_spans: Vec<Option<Vec<Span>>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content, keeping the cache of every line that is unchanged
    /// at the same position
    pub fn update_text(&mut self, text: &str) {
        let mut count = 0;
        for (idx, line) in text.lines().enumerate() {
            match self.lines.get(idx) {
                Some(old) if old == line => {}
                Some(_) => self.replace_line(idx, line),
                None => self.insert_line(idx, line),
            }
            count = idx + 1;
        }
        while self.lines.len() > count {
            self.remove_line(self.lines.len() - 1);
        }
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace the text of one line
    pub fn replace_line(&mut self, idx: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(idx) {
            *line = text.to_string();
            self.line_spans[idx] = None;
        }
    }

    /// Insert a line before `idx` (or append when `idx` is past the end)
    pub fn insert_line(&mut self, idx: usize, text: &str) {
        let idx = idx.min(self.lines.len());
        self.lines.insert(idx, text.to_string());
        self.line_spans.insert(idx, None);
    }

    pub fn remove_line(&mut self, idx: usize) -> Option<String> {
        if idx >= self.lines.len() {
            return None;
        }
        self.line_spans.remove(idx);
        Some(self.lines.remove(idx))
    }

    /// Spans for a line, highlighting it first if the cache is stale
    pub fn spans(&mut self, idx: usize, highlighter: &Highlighter) -> &[Span] {
        let Some(text) = self.lines.get(idx) else {
            return &[];
        };
        let slot = &mut self.line_spans[idx];
        slot.get_or_insert_with(|| highlighter.highlight(text))
    }
}

#[cfg(test)]
impl Document {
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.update_text(text);
        doc
    }

    pub fn text(&self) -> String {
        let mut out = self.lines.join("\n");
        if !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Whether a line currently has cached spans
    pub fn is_cached(&self, idx: usize) -> bool {
        matches!(self.line_spans.get(idx), Some(Some(_)))
    }
}
