//! Built-in rules for configuration and result documents

use serde::Deserialize;

use super::highlighter::Highlighter;
use super::rules::HighlightError;
use super::style::{Color, Style};

/// Bracketed residue tag, e.g. `[ABC]` or `[]`
pub const TAG_PATTERN: &str = r"(\[[A-Z]*\])";

/// First character after an annotated sequence's legal run
pub const ILLEGAL_CHAR_PATTERN: &str = r"AnnotatedSequence:[A-Z\s\[\]]*([^A-Z\s\[\]])";

/// `key:` at the start of a line, followed by end of line or whitespace
pub const KEY_PATTERN: &str = r"^\s*([\w_()]*:)(?:$|\s)";

/// Colors used by the built-in rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub alert: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Rgb(0xff, 0xd7, 0x40),
            secondary: Color::Rgb(0x23, 0x26, 0x29),
            alert: Color::Rgb(0xdc, 0x35, 0x45),
        }
    }
}

impl Theme {
    pub fn tag_style(&self) -> Style {
        Style::fg(self.secondary).with_bg(self.primary)
    }

    pub fn error_style(&self) -> Style {
        Style::bg(self.alert).with_fg(self.secondary)
    }

    pub fn key_style(&self) -> Style {
        Style::default().with_underline().with_italic()
    }
}

/// Engine with the tag, illegal-character and key rules, in that order
pub fn document_highlighter(theme: &Theme) -> Result<Highlighter, HighlightError> {
    let mut engine = Highlighter::new();
    engine.register(TAG_PATTERN, theme.tag_style())?;
    engine.register(ILLEGAL_CHAR_PATTERN, theme.error_style())?;
    engine.register(KEY_PATTERN, theme.key_style())?;
    Ok(engine)
}
