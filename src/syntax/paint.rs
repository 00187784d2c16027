//! Resolve overlapping spans into flat styled runs
//!
//! Spans are painted in order; each one replaces whatever style the bytes
//! under it had. The result is a left-to-right cover of the line with no
//! overlaps, ready to be written to a terminal.

use super::style::{Span, Style};

/// A contiguous byte range sharing one style (`None` = unstyled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end: usize,
    pub style: Option<Style>,
}

/// Paint `spans` over `text` with later-wins precedence
pub fn resolve(text: &str, spans: &[Span]) -> Vec<Run> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut painted: Vec<Option<Style>> = vec![None; text.len()];
    for span in spans {
        let start = span.start.min(text.len());
        let end = span.end.min(text.len());
        if start >= end {
            continue;
        }
        for slot in &mut painted[start..end] {
            *slot = Some(span.style);
        }
    }

    let mut runs: Vec<Run> = Vec::new();
    for (pos, ch) in text.char_indices() {
        let end = pos + ch.len_utf8();
        // A char takes the style of its first byte
        let style = painted[pos];
        match runs.last_mut() {
            Some(run) if run.style == style => run.end = end,
            _ => runs.push(Run { start: pos, end, style }),
        }
    }
    runs
}
