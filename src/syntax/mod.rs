//! Syntax highlighting module
//!
//! This module provides the rule-based highlighter used for:
//! - Configuration documents (global parameters, protein sequences)
//! - Computation results
//! - Any other line-oriented text a host wants decorated

mod builtin;
mod document;
mod highlighter;
mod paint;
mod rules;
mod style;

pub use builtin::{document_highlighter, Theme};
pub use document::Document;
pub use highlighter::Highlighter;
pub use paint::{resolve, Run};
pub use rules::HighlightError;
pub use style::{Color, Style};
