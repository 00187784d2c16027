//! Display rendering
//!
//! Turns highlighted documents into terminal output: side-by-side panels for
//! the interactive viewer, and plain or ANSI-styled text for stdout.

use std::io::Write;
use std::sync::Arc;

use crossterm::style::{Attribute, ContentStyle};

use crate::error::Result;
use crate::syntax::{self, Color, Document, Highlighter, Style};
use crate::terminal::Terminal;

/// One titled, scrollable view onto a document
pub struct Panel {
    pub title: String,
    pub doc: Document,
    /// Rule set shared with the other panels
    highlighter: Arc<Highlighter>,
    /// First visible line
    pub top_line: usize,
}

impl Panel {
    pub fn new(title: impl Into<String>, highlighter: Arc<Highlighter>) -> Self {
        Self {
            title: title.into(),
            doc: Document::new(),
            highlighter,
            top_line: 0,
        }
    }

    /// Show new content; lines that did not change keep their highlighting
    pub fn set_text(&mut self, text: &str) {
        self.doc.update_text(text);
        self.scroll(0);
    }

    pub fn scroll(&mut self, delta: isize) {
        let max_top = self.doc.line_count().saturating_sub(1);
        self.top_line = self.top_line.saturating_add_signed(delta).min(max_top);
    }

    /// Styled runs for a visible line
    fn runs(&mut self, idx: usize) -> Option<(&str, Vec<syntax::Run>)> {
        let spans = self.doc.spans(idx, &self.highlighter).to_vec();
        let text = self.doc.line(idx)?;
        Some((text, syntax::resolve(text, &spans)))
    }
}

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in the bottom line
    message: Option<String>,
    /// The message is a prompt being typed into
    prompting: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            needs_redraw: true,
            message: None,
            prompting: false,
        }
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.prompting = false;
    }

    /// Show a prompt with the cursor after it
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.message = Some(prompt.into());
        self.prompting = true;
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
        self.prompting = false;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Render all panels side by side with the message line below
    pub fn render(&mut self, terminal: &mut Terminal, panels: &mut [Panel], focused: usize) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows() as usize;

        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        if !panels.is_empty() && rows >= 3 {
            let count = panels.len();
            // One separator column between neighbours
            let width = cols.saturating_sub(count - 1) / count;
            let height = rows - 2;

            for (i, panel) in panels.iter_mut().enumerate() {
                let left = i * (width + 1);
                self.render_panel(terminal, panel, left, width, height, i == focused)?;
                if i + 1 < count {
                    for row in 0..rows - 1 {
                        terminal.move_cursor(row as u16, (left + width) as u16)?;
                        terminal.write_str("│")?;
                    }
                }
            }
        }

        self.render_minibuffer(terminal, rows.saturating_sub(1) as u16, cols)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    fn render_panel(
        &self,
        terminal: &mut Terminal,
        panel: &mut Panel,
        left: usize,
        width: usize,
        height: usize,
        is_focused: bool,
    ) -> Result<()> {
        // Title bar, reversed when focused
        terminal.move_cursor(0, left as u16)?;
        let marker = if is_focused { '*' } else { '-' };
        let title = format!("{} {} ", marker, panel.title);
        if is_focused {
            terminal.set_reverse(true)?;
        }
        write_padded(terminal, &truncate_to_width(&title, width), width)?;
        terminal.reset_attributes()?;

        for row_offset in 0..height {
            let line_idx = panel.top_line + row_offset;
            terminal.move_cursor((row_offset + 1) as u16, left as u16)?;

            if row_offset == 0 && panel.doc.is_empty() {
                write_padded(terminal, &truncate_to_width("(nothing loaded)", width), width)?;
                continue;
            }

            match panel.runs(line_idx) {
                Some((text, runs)) => {
                    let used = render_runs(terminal, text, &runs, width)?;
                    terminal.write_str(&" ".repeat(width - used))?;
                }
                None => write_padded(terminal, "", width)?,
            }
        }
        Ok(())
    }

    /// Render the message area
    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;

        let mut shown = 0;
        if let Some(ref msg) = self.message {
            // Multi-line messages (tracebacks, help) show their first line
            let first = msg.lines().next().unwrap_or("");
            let text = truncate_to_width(first, cols);
            shown = display_width(&text);
            terminal.write_str(&text)?;
        }
        terminal.clear_to_eol()?;

        if self.prompting {
            terminal.move_cursor(row, shown.min(cols.saturating_sub(1)) as u16)?;
        }
        terminal.set_cursor_visible(self.prompting)?;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Write styled runs up to `max_cols` display columns; returns columns used
fn render_runs(terminal: &mut Terminal, text: &str, runs: &[syntax::Run], max_cols: usize) -> Result<usize> {
    let mut used = 0;
    for run in runs {
        if used >= max_cols {
            break;
        }
        let piece = truncate_to_width(&text[run.start..run.end], max_cols - used);
        used += display_width(&piece);
        match run.style {
            Some(style) => {
                terminal.apply_style(&style)?;
                terminal.write_str(&piece)?;
                terminal.reset_attributes()?;
            }
            None => terminal.write_str(&piece)?,
        }
    }
    Ok(used)
}

fn write_padded(terminal: &mut Terminal, text: &str, width: usize) -> Result<()> {
    let pad = width.saturating_sub(display_width(text));
    terminal.write_str(text)?;
    terminal.write_str(&" ".repeat(pad))?;
    Ok(())
}

/// Print `text` line by line, ANSI-styled when `color` is set
pub fn print_highlighted(out: &mut dyn Write, text: &str, highlighter: &Highlighter, color: bool) -> Result<()> {
    for line in text.lines() {
        if color {
            let runs = syntax::resolve(line, &highlighter.highlight(line));
            for run in runs {
                let piece = &line[run.start..run.end];
                match run.style {
                    Some(style) => write!(out, "{}", content_style(&style).apply(piece))?,
                    None => write!(out, "{}", piece)?,
                }
            }
            writeln!(out)?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Convert a highlight style into crossterm's representation
pub fn content_style(style: &Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = term_color(style.fg);
    content.background_color = term_color(style.bg);
    if style.italic {
        content.attributes.set(Attribute::Italic);
    }
    if style.underline {
        content.attributes.set(Attribute::Underlined);
    }
    content
}

fn term_color(color: Color) -> Option<crossterm::style::Color> {
    use crossterm::style::Color as C;
    let mapped = match color {
        Color::Default => return None,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::White => C::Grey,
        Color::BrightBlack => C::DarkGrey,
        Color::BrightRed => C::Red,
        Color::BrightGreen => C::Green,
        Color::BrightYellow => C::Yellow,
        Color::BrightBlue => C::Blue,
        Color::BrightMagenta => C::Magenta,
        Color::BrightCyan => C::Cyan,
        Color::BrightWhite => C::White,
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
    };
    Some(mapped)
}

fn display_width(s: &str) -> usize {
    s.chars()
        .map(|ch| unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1))
        .sum()
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}
