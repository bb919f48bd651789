//! UI rendering logic
//!
//! Handles layout and rendering of the application using Ratatui.
//! Layout structure:
//! - Title bar (1 line, fixed)
//! - Middle section (responsive height):
//!   - Tree viewer (`viewer.tree_width` columns)
//!   - File viewer (remaining space)
//! - Status line (1 line, fixed)

use super::app::App;
use super::model::{Focus, Selection};
use super::viewer::Viewer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use stepview_parser::step::TokenKind;

/// Minimum terminal width required for the UI
const MIN_TERMINAL_WIDTH: u16 = 60;
/// Height of the status line
const STATUS_LINE_HEIGHT: u16 = 1;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .split(size);

    render_title_bar(frame, chunks[0], app);
    render_middle_section(frame, chunks[1], app);
    render_status_line(frame, chunks[2], app);
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph =
        Paragraph::new(msg).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!("stepv:: {} [{}]", app.file_name(), app.split_mode().as_str());
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

fn render_middle_section(frame: &mut Frame, area: Rect, app: &App) {
    // The file panel always keeps some room
    let tree_width = app
        .settings()
        .tree_width
        .min(area.width.saturating_sub(MIN_TERMINAL_WIDTH / 2));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(tree_width), Constraint::Min(1)])
        .split(area);

    render_panel(frame, chunks[0], "Forest", app.focus == Focus::TreeViewer, |f, inner| {
        app.tree_viewer.render(f, inner, &app.model)
    });
    render_panel(frame, chunks[1], "File", app.focus == Focus::FileViewer, |f, inner| {
        app.file_viewer.render(f, inner, &app.model)
    });
}

fn render_panel(
    frame: &mut Frame,
    area: Rect,
    name: &str,
    focused: bool,
    content: impl FnOnce(&mut Frame, Rect),
) {
    let title = if focused {
        format!("{name} [FOCUSED]")
    } else {
        name.to_string()
    };
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);
    content(frame, inner_area);
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Yellow))
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Some(status) = app.status() {
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(reason) = app.model.unloaded_reason() {
        spans.push(Span::styled(
            "Unloaded",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" | "));
        spans.push(Span::raw(reason.to_string()));
    } else {
        match app.model.selection() {
            Selection::TreeSelection(node_id) => {
                spans.push(Span::styled(
                    "Forest",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(" | "));
                if node_id.is_root() {
                    spans.push(label("Selection: "));
                    spans.push(Span::raw("File"));
                } else {
                    let path_str = node_id
                        .path()
                        .iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>()
                        .join("→");
                    spans.push(label("Path: "));
                    spans.push(Span::raw(format!("[{path_str}]")));
                    if let Some(line) = app.model.get_line_for_node(node_id) {
                        spans.push(Span::raw(" | "));
                        spans.push(label("Line: "));
                        spans.push(Span::raw((line + 1).to_string()));
                    }
                    spans.push(Span::raw(" | "));
                    spans.push(label("State: "));
                    spans.push(Span::raw(if app.model.is_node_expanded(node_id) {
                        "Expanded"
                    } else {
                        "Collapsed"
                    }));
                }
            }
            Selection::TextSelection(row, col) => {
                spans.push(Span::styled(
                    "Text",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(" | "));
                spans.push(label("Cursor: "));
                spans.push(Span::raw(format!("Line {}, Col {}", row + 1, col + 1)));

                let token = app
                    .model
                    .document()
                    .and_then(|doc| doc.line(*row))
                    .and_then(|line| line.token_at_column(*col));
                if let Some(token) = token {
                    spans.push(Span::raw(" | "));
                    spans.push(label("Token: "));
                    spans.push(Span::raw(format!("{} {}", token.kind, token.text)));
                    if token.kind == TokenKind::Reference {
                        spans.push(Span::raw(" (Enter to follow)"));
                    }
                }
            }
        }
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(paragraph, area);
}
