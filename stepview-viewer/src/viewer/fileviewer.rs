//! File viewer - displays and navigates the tokenized lines
//!
//! Every line is drawn from its classified tokens, one color per token kind, with a
//! line-number gutter. The cursor moves with the arrow keys and pages with
//! PageUp/PageDown; each move emits a SelectPosition event so the tree viewer can
//! follow. Enter on a reference token emits FollowReference.

use super::model::Model;
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use std::cell::Cell;
use stepview_parser::step::{Line as SourceLine, TokenKind};

/// Rows assumed before the first render reports the real viewport
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Keyword => Style::default().fg(Color::Cyan),
        TokenKind::Number => Style::default().fg(Color::Magenta),
        TokenKind::String => Style::default().fg(Color::Green),
        TokenKind::Flag => Style::default().fg(Color::Yellow),
        TokenKind::Reference => Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED),
        TokenKind::Sign => Style::default().fg(Color::DarkGray),
        TokenKind::Separator => Style::default().fg(Color::Gray),
        TokenKind::Unknown => Style::default(),
    }
}

fn cursor_style() -> Style {
    Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Spans for one source line, with the cursor cell split out of its token
fn styled_spans(line: &SourceLine, cursor_col: Option<usize>, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut col = 0;
    for token in &line.tokens {
        let style = base.patch(token_style(token.kind));
        let len = token.char_len();
        match cursor_col {
            Some(cursor) if cursor >= col && cursor < col + len => {
                let offset = cursor - col;
                let before: String = token.text.chars().take(offset).collect();
                let at: String = token.text.chars().skip(offset).take(1).collect();
                let after: String = token.text.chars().skip(offset + 1).collect();
                if !before.is_empty() {
                    spans.push(Span::styled(before, style));
                }
                spans.push(Span::styled(at, cursor_style()));
                if !after.is_empty() {
                    spans.push(Span::styled(after, style));
                }
            }
            _ if len > 0 => spans.push(Span::styled(token.text.clone(), style)),
            _ => {}
        }
        col += len;
    }
    // Cursor past the last character
    if cursor_col.is_some_and(|cursor| cursor >= col) {
        spans.push(Span::styled(" ", cursor_style()));
    }
    spans
}

/// File viewer - displays and navigates the tokenized lines
#[derive(Debug)]
pub struct FileViewer {
    /// Current cursor row (0-indexed)
    cursor_row: usize,
    /// Current cursor column in characters (0-indexed)
    cursor_col: usize,
    /// How many lines are scrolled off the top of the viewport
    scroll_offset: usize,
    /// Rows available at the last render
    viewport_height: Cell<usize>,
}

impl FileViewer {
    pub fn new() -> Self {
        FileViewer {
            cursor_row: 0,
            cursor_col: 0,
            scroll_offset: 0,
            viewport_height: Cell::new(DEFAULT_VIEWPORT_HEIGHT),
        }
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn viewport_height(&self) -> usize {
        self.viewport_height.get().max(1)
    }

    /// Sync cursor to a specific position (called when model selection changes)
    pub fn sync_cursor_to_position(&mut self, row: usize, col: usize, model: &Model) {
        self.cursor_row = row.min(model.line_count().saturating_sub(1));
        self.cursor_col = col;
        self.clamp_cursor_column(model);
        self.ensure_cursor_visible();
    }

    /// Put the cursor at the start of `row` and scroll so the row sits mid-viewport
    pub fn center_on(&mut self, row: usize, model: &Model) {
        self.cursor_row = row.min(model.line_count().saturating_sub(1));
        self.cursor_col = 0;
        self.scroll_offset = self.cursor_row.saturating_sub(self.viewport_height() / 2);
    }

    /// Back to the top, e.g. after the document went away
    pub fn reset(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
    }

    fn move_cursor_up(&mut self, model: &Model) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_cursor_column(model);
            self.ensure_cursor_visible();
        }
    }

    fn move_cursor_down(&mut self, model: &Model) {
        if self.cursor_row + 1 < model.line_count() {
            self.cursor_row += 1;
            self.clamp_cursor_column(model);
            self.ensure_cursor_visible();
        }
    }

    fn move_cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    fn move_cursor_right(&mut self, model: &Model) {
        if self.cursor_col < model.line_len(self.cursor_row) {
            self.cursor_col += 1;
        }
    }

    fn page_up(&mut self, model: &Model) {
        let page = self.viewport_height();
        self.cursor_row = self.cursor_row.saturating_sub(page);
        self.scroll_offset = self.scroll_offset.saturating_sub(page);
        self.clamp_cursor_column(model);
        self.ensure_cursor_visible();
    }

    fn page_down(&mut self, model: &Model) {
        let page = self.viewport_height();
        let last = model.line_count().saturating_sub(1);
        self.cursor_row = (self.cursor_row + page).min(last);
        self.scroll_offset = (self.scroll_offset + page).min(last);
        self.clamp_cursor_column(model);
        self.ensure_cursor_visible();
    }

    fn clamp_cursor_column(&mut self, model: &Model) {
        self.cursor_col = self.cursor_col.min(model.line_len(self.cursor_row));
    }

    fn ensure_cursor_visible(&mut self) {
        let height = self.viewport_height();
        if self.cursor_row < self.scroll_offset {
            self.scroll_offset = self.cursor_row;
        } else if self.cursor_row >= self.scroll_offset + height {
            self.scroll_offset = self.cursor_row + 1 - height;
        }
    }

    /// Enter on a reference token
    fn activate(&self, model: &Model) -> ViewerEvent {
        let token = model
            .document()
            .and_then(|doc| doc.line(self.cursor_row))
            .and_then(|line| line.token_at_column(self.cursor_col));
        match token.and_then(|token| token.reference_target()) {
            Some(identifier) => ViewerEvent::FollowReference(identifier),
            None => ViewerEvent::NoChange,
        }
    }
}

impl Default for FileViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer for FileViewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model) {
        let height = area.height as usize;
        self.viewport_height.set(height);

        let Some(doc) = model.document() else {
            let reason = model.unloaded_reason().unwrap_or("unknown reason");
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    "No document loaded",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(reason.to_string()),
                Line::from(""),
                Line::from("Press r to reload, q to quit"),
            ])
            .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
            return;
        };

        // A resize can leave the stored offset stale; keep the cursor in view regardless
        let mut offset = self.scroll_offset;
        if height > 0 && self.cursor_row >= offset + height {
            offset = self.cursor_row + 1 - height;
        }
        offset = offset.min(self.cursor_row);

        let gutter_width = doc.line_count().to_string().len();
        let flashed = model.flashed_line();

        let lines: Vec<Line> = doc
            .lines()
            .iter()
            .skip(offset)
            .take(height)
            .map(|line| {
                let is_cursor_row = line.index == self.cursor_row;
                let base = if flashed == Some(line.index) {
                    Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let gutter_style = if is_cursor_row {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let mut spans = vec![Span::styled(
                    format!("{:>width$} ", line.index + 1, width = gutter_width),
                    gutter_style,
                )];
                let cursor = is_cursor_row.then_some(self.cursor_col);
                spans.extend(styled_spans(line, cursor, base));
                Line::from(spans).style(base)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent> {
        if !model.is_loaded() {
            return Some(ViewerEvent::NoChange);
        }

        let before = self.cursor_position();
        match key.code {
            KeyCode::Up => self.move_cursor_up(model),
            KeyCode::Down => self.move_cursor_down(model),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(model),
            KeyCode::PageUp => self.page_up(model),
            KeyCode::PageDown => self.page_down(model),
            KeyCode::Home => self.cursor_col = 0,
            KeyCode::End => self.cursor_col = model.line_len(self.cursor_row),
            KeyCode::Enter => return Some(self.activate(model)),
            _ => return Some(ViewerEvent::NoChange),
        }

        if self.cursor_position() != before {
            Some(ViewerEvent::SelectPosition(self.cursor_row, self.cursor_col))
        } else {
            Some(ViewerEvent::NoChange)
        }
    }
}
