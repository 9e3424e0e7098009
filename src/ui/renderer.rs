//! Page renderer using crossterm.
//!
//! Draws the page shell (heading) and the terminal widget: output region,
//! input line, button panel and a status line.
//!
//! ```text
//! row 0          heading
//! row 1          ────────
//! rows 2..       output region (scrollable, wrapped)
//! input_y        > input
//! input_y + 1    ────────
//! caption_y      Click a command to execute:
//! panel_y..      [help] [projects] ...
//! last row       status / key hints
//! ```
//!
//! Every frame is a full redraw wrapped in a synchronized update.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{Color, ColorScheme};
use crate::core::session::{TerminalSession, ECHO_PREFIX};
use super::button_panel::{ButtonPanel, ButtonState};

const CAPTION: &str = "Click a command to execute:";
const HINTS: &str = "Tab: focus  Enter: run  Ctrl+L: clear  PgUp/PgDn: scroll  Esc: quit";
const BUSY_LABEL: &str = "running…";

/// Rows outside the output region and the button panel.
const FIXED_ROWS: u16 = 6;

/// Begin a render frame (synchronized update, hide cursor, disable autowrap)
fn begin_frame<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[?2026h")?;  // Begin synchronized update
    write!(out, "\x1b[?7l")?;      // Disable autowrap
    execute!(out, Hide)?;
    Ok(())
}

/// End a render frame (place cursor, enable autowrap, end synchronized update, flush)
fn end_frame<W: Write>(out: &mut W, cursor: Option<(u16, u16)>) -> io::Result<()> {
    if let Some((col, row)) = cursor {
        execute!(out, MoveTo(col, row), Show)?;
    }
    write!(out, "\x1b[?7h")?;      // Enable autowrap
    write!(out, "\x1b[?2026l")?;   // End synchronized update
    out.flush()?;
    Ok(())
}

/// Screen regions for a given window size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub output_top: u16,
    pub output_height: u16,
    pub input_y: u16,
    pub caption_y: u16,
    pub panel_y: u16,
    pub panel_height: u16,
    pub status_y: u16,
}

impl Layout {
    pub fn compute(width: u16, height: u16, panel_height: u16) -> Self {
        let output_top = 2;
        let output_height = height.saturating_sub(FIXED_ROWS + panel_height);
        let input_y = output_top + output_height;
        let caption_y = input_y + 2;
        let panel_y = caption_y + 1;
        Self {
            width,
            height,
            output_top,
            output_height,
            input_y,
            caption_y,
            panel_y,
            panel_height,
            status_y: panel_y + panel_height,
        }
    }

    /// Whether a button row lands on screen above the status line
    pub fn panel_row_visible(&self, row: u16) -> bool {
        row < self.status_y && row < self.height
    }

    /// Layout for the current window and panel contents
    pub fn for_panel(width: u16, height: u16, panel: &ButtonPanel) -> Self {
        Self::compute(width, height, panel.height(width))
    }
}

/// How an output line is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Echo,
    Notice,
    Text,
}

fn line_kind(line: &str, notice: Option<&str>) -> LineKind {
    if line.starts_with(ECHO_PREFIX) {
        LineKind::Echo
    } else if notice == Some(line) {
        LineKind::Notice
    } else {
        LineKind::Text
    }
}

/// Split `text` into rows of at most `width` display columns.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if row_width + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }
        row.push(ch);
        row_width += w;
    }
    rows.push(row);
    rows
}

/// Wrapped rows visible in a region of `height` rows scrolled `scroll` rows
/// up from the bottom. Also returns the largest useful scroll offset.
pub fn visible_rows(
    lines: &[String],
    width: usize,
    height: usize,
    scroll: usize,
    notice: Option<&str>,
) -> (Vec<(LineKind, String)>, usize) {
    let rows: Vec<(LineKind, String)> = lines
        .iter()
        .flat_map(|line| {
            let kind = line_kind(line, notice);
            wrap_line(line, width).into_iter().map(move |row| (kind, row))
        })
        .collect();

    let max_scroll = rows.len().saturating_sub(height);
    let scroll = scroll.min(max_scroll);
    let end = rows.len() - scroll;
    let start = end.saturating_sub(height);
    (rows[start..end].to_vec(), max_scroll)
}

/// Keep the head of `text` that fits in `width` columns.
fn head_fitting(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..i];
        }
        used += w;
    }
    text
}

/// Keep the tail of `text` that fits in `width` columns.
fn tail_fitting(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (i, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    &text[start..]
}

fn set_colors<W: Write>(out: &mut W, fg: Color, bg: Color) -> io::Result<()> {
    execute!(out, SetForegroundColor(fg.to_crossterm()), SetBackgroundColor(bg.to_crossterm()))
}

/// Write `text` padded with spaces to `width` columns
fn write_padded<W: Write>(out: &mut W, text: &str, width: usize) -> io::Result<()> {
    let pad = width.saturating_sub(text.width());
    write!(out, "{}{:pad$}", text, "", pad = pad)
}

/// Page renderer
pub struct Renderer {
    initialized: bool,
    pub color_scheme: ColorScheme,
    /// Largest scroll offset seen on the last frame
    max_scroll: usize,
}

impl Renderer {
    pub fn new(color_scheme: ColorScheme) -> Self {
        Self {
            initialized: false,
            color_scheme,
            max_scroll: 0,
        }
    }

    /// Initialize the terminal
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            crossterm::event::EnableMouseCapture,
            Clear(ClearType::All)
        )?;
        stdout.flush()?;

        self.initialized = true;
        Ok(())
    }

    /// Cleanup
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }

        let mut stdout = io::stdout();

        // Restore terminal state (in case of abnormal exit)
        write!(stdout, "\x1b[?7h")?;      // Enable autowrap
        write!(stdout, "\x1b[?2026l")?;   // End synchronized update (if active)
        stdout.flush()?;

        execute!(
            stdout,
            ResetColor,
            SetAttribute(Attribute::Reset),
            Show,
            crossterm::event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        self.initialized = false;
        Ok(())
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn max_scroll(&self) -> usize {
        self.max_scroll
    }

    /// Draw a full frame
    pub fn render(
        &mut self,
        session: &TerminalSession,
        panel: &ButtonPanel,
        layout: &Layout,
        title: &str,
    ) -> io::Result<()> {
        let stdout = io::stdout();
        let mut stdout = io::BufWriter::with_capacity(65536, stdout.lock());

        begin_frame(&mut stdout)?;
        let result = self.draw(&mut stdout, session, panel, layout, title);
        let cursor = self.cursor_position(session, panel, layout);
        // Always end frame, even on error
        let _ = end_frame(&mut stdout, cursor);
        result
    }

    fn draw<W: Write>(
        &mut self,
        out: &mut W,
        session: &TerminalSession,
        panel: &ButtonPanel,
        layout: &Layout,
        title: &str,
    ) -> io::Result<()> {
        let cs = &self.color_scheme;

        execute!(out, SetBackgroundColor(cs.page_bg.to_crossterm()), Clear(ClearType::All))?;

        self.render_heading(out, layout, title)?;
        self.render_rule(out, layout, 1)?;
        self.render_output(out, session, layout)?;
        self.render_input(out, session, panel, layout)?;
        self.render_rule(out, layout, layout.input_y + 1)?;
        self.render_panel(out, session, panel, layout)?;
        self.render_status(out, session, layout)?;

        execute!(out, ResetColor)?;
        Ok(())
    }

    fn render_heading<W: Write>(&self, out: &mut W, layout: &Layout, title: &str) -> io::Result<()> {
        let cs = &self.color_scheme;
        let title = head_fitting(title, layout.width as usize);
        let x = (layout.width as usize).saturating_sub(title.width()) / 2;
        execute!(out, MoveTo(x as u16, 0))?;
        set_colors(out, cs.heading_fg, cs.page_bg)?;
        execute!(out, SetAttribute(Attribute::Bold), Print(title), SetAttribute(Attribute::NormalIntensity))?;
        Ok(())
    }

    fn render_rule<W: Write>(&self, out: &mut W, layout: &Layout, row: u16) -> io::Result<()> {
        if row >= layout.height {
            return Ok(());
        }
        let cs = &self.color_scheme;
        execute!(out, MoveTo(0, row))?;
        set_colors(out, cs.border, cs.page_bg)?;
        write!(out, "{}", "─".repeat(layout.width as usize))?;
        Ok(())
    }

    fn render_output<W: Write>(&mut self, out: &mut W, session: &TerminalSession, layout: &Layout) -> io::Result<()> {
        let width = layout.width as usize;
        let height = layout.output_height as usize;
        let (rows, max_scroll) = visible_rows(
            session.output().lines(),
            width,
            height,
            session.scroll_offset(),
            session.guard().notice(),
        );
        self.max_scroll = max_scroll;

        let cs = &self.color_scheme;
        for i in 0..height {
            execute!(out, MoveTo(0, layout.output_top + i as u16))?;
            let (kind, text) = match rows.get(i) {
                Some((kind, text)) => (*kind, text.as_str()),
                None => (LineKind::Text, ""),
            };
            let fg = match kind {
                LineKind::Echo => cs.echo_fg,
                LineKind::Notice => cs.notice_fg,
                LineKind::Text => cs.output_fg,
            };
            set_colors(out, fg, cs.terminal_bg)?;
            write_padded(out, text, width)?;
        }
        Ok(())
    }

    fn render_input<W: Write>(
        &self,
        out: &mut W,
        session: &TerminalSession,
        panel: &ButtonPanel,
        layout: &Layout,
    ) -> io::Result<()> {
        if layout.input_y >= layout.height {
            return Ok(());
        }
        let cs = &self.color_scheme;
        let busy = session.is_busy();
        let (prompt_fg, input_fg) = if busy {
            (cs.disabled_fg, cs.disabled_fg)
        } else {
            (cs.prompt_fg, cs.input_fg)
        };

        execute!(out, MoveTo(0, layout.input_y))?;
        set_colors(out, prompt_fg, cs.terminal_bg)?;
        write!(out, "{}", ECHO_PREFIX)?;

        let room = (layout.width as usize).saturating_sub(ECHO_PREFIX.len() + 1);
        let text = tail_fitting(session.input(), room);
        set_colors(out, input_fg, cs.terminal_bg)?;
        if panel.focus.is_some() {
            execute!(out, SetAttribute(Attribute::Dim))?;
        }
        write_padded(out, text, (layout.width as usize).saturating_sub(ECHO_PREFIX.len()))?;
        execute!(out, SetAttribute(Attribute::NormalIntensity))?;
        Ok(())
    }

    fn render_panel<W: Write>(
        &self,
        out: &mut W,
        session: &TerminalSession,
        panel: &ButtonPanel,
        layout: &Layout,
    ) -> io::Result<()> {
        let cs = &self.color_scheme;
        if layout.caption_y < layout.height {
            execute!(out, MoveTo(0, layout.caption_y))?;
            set_colors(out, cs.heading_fg, cs.page_bg)?;
            write!(out, "{}", CAPTION)?;
        }

        let busy = session.is_busy();
        for (i, button) in panel.buttons.iter().enumerate() {
            if !layout.panel_row_visible(button.y) {
                continue;
            }
            let state = panel.state(i, busy);
            let (fg, bg) = if state.contains(ButtonState::DISABLED) {
                (cs.disabled_fg, cs.border)
            } else if state.contains(ButtonState::FOCUSED) {
                (cs.button_focus_fg, cs.button_focus_bg)
            } else if state.contains(ButtonState::DESTRUCTIVE) {
                (cs.danger_fg, cs.danger_bg)
            } else if state.contains(ButtonState::HOVERED) {
                (cs.button_fg, cs.button_hover_bg)
            } else {
                (cs.button_fg, cs.button_bg)
            };

            execute!(out, MoveTo(button.x, button.y))?;
            set_colors(out, fg, bg)?;
            if state.contains(ButtonState::EXPANDED) {
                execute!(out, SetAttribute(Attribute::Bold))?;
            }
            write!(out, " {} ", button.label)?;
            execute!(out, SetAttribute(Attribute::NormalIntensity))?;
        }
        Ok(())
    }

    fn render_status<W: Write>(&self, out: &mut W, session: &TerminalSession, layout: &Layout) -> io::Result<()> {
        if layout.status_y >= layout.height {
            return Ok(());
        }
        let cs = &self.color_scheme;
        execute!(out, MoveTo(0, layout.status_y))?;
        set_colors(out, cs.border, cs.page_bg)?;

        let width = layout.width as usize;
        let right = if session.is_busy() { BUSY_LABEL } else { "" };
        let hints = tail_fitting(HINTS, width.saturating_sub(right.width() + 1));
        let padding = width.saturating_sub(hints.width() + right.width());
        write!(out, "{}{:padding$}", hints, "", padding = padding)?;
        set_colors(out, cs.notice_fg, cs.page_bg)?;
        write!(out, "{}", right)?;
        Ok(())
    }

    /// Cursor sits at the end of the input line when it can take text
    fn cursor_position(&self, session: &TerminalSession, panel: &ButtonPanel, layout: &Layout) -> Option<(u16, u16)> {
        if session.is_busy() || panel.focus.is_some() || layout.input_y >= layout.height {
            return None;
        }
        let room = (layout.width as usize).saturating_sub(ECHO_PREFIX.len() + 1);
        let col = ECHO_PREFIX.len() + tail_fitting(session.input(), room).width();
        Some((col as u16, layout.input_y))
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layout_regions() {
        let layout = Layout::compute(80, 24, 2);
        assert_eq!(layout.output_top, 2);
        assert_eq!(layout.output_height, 16);
        assert_eq!(layout.input_y, 18);
        assert_eq!(layout.caption_y, 20);
        assert_eq!(layout.panel_y, 21);
        assert_eq!(layout.status_y, 23);
    }

    #[test]
    fn test_layout_tiny_window() {
        let layout = Layout::compute(20, 5, 3);
        assert_eq!(layout.output_height, 0);
        assert!(layout.status_y >= layout.height);
        // Panel rows fall below the window, not just below the status line
        assert!(layout.panel_y < layout.status_y);
        assert!(!layout.panel_row_visible(layout.panel_y));
        assert!(!layout.panel_row_visible(layout.status_y - 1));
    }

    #[test]
    fn test_panel_rows_visible() {
        let layout = Layout::compute(80, 24, 2);
        assert!(layout.panel_row_visible(21));
        assert!(layout.panel_row_visible(22));
        assert!(!layout.panel_row_visible(23));
    }

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("", 5), vec![String::new()]);
        assert_eq!(wrap_line("abcdefg", 3), lines(&["abc", "def", "g"]));
        // Wide characters take two columns
        assert_eq!(wrap_line("日本語", 4), lines(&["日本", "語"]));
        assert_eq!(wrap_line("abc", 0), vec![String::new()]);
    }

    #[test]
    fn test_visible_rows_bottom_and_scroll() {
        let output = lines(&["> help", "aaaaaa", "b", "[cleared]"]);
        let (rows, max) = visible_rows(&output, 3, 3, 0, Some("[cleared]"));
        // 2 + 2 + 1 + 3 wrapped rows
        assert_eq!(max, 5);
        let texts: Vec<_> = rows.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["[cl", "ear", "ed]"]);
        assert_eq!(rows[0].0, LineKind::Notice);

        let (rows, _) = visible_rows(&output, 3, 3, 100, None);
        let texts: Vec<_> = rows.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["> h", "elp", "aaa"]);
        assert_eq!(rows[0].0, LineKind::Echo);
        assert_eq!(rows[2].0, LineKind::Text);
    }

    #[test]
    fn test_visible_rows_short_output() {
        let output = lines(&["> xyz"]);
        let (rows, max) = visible_rows(&output, 80, 10, 3, None);
        assert_eq!(max, 0);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_head_fitting() {
        assert_eq!(head_fitting("Welcome to My Portfolio", 7), "Welcome");
        assert_eq!(head_fitting("work 1", 10), "work 1");
        assert_eq!(head_fitting("日本語", 3), "日");
        assert_eq!(head_fitting("abc", 0), "");
    }

    #[test]
    fn test_tail_fitting() {
        assert_eq!(tail_fitting("work 1", 10), "work 1");
        assert_eq!(tail_fitting("certifications", 5), "tions");
        assert_eq!(tail_fitting("日本語", 3), "語");
        assert_eq!(tail_fitting("abc", 0), "");
    }
}
