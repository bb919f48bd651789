//! Tree viewer - displays and navigates the reference forest
//!
//! The forest is shown under a virtual file node, one row per record occurrence.
//! Up/Down move the selection, Left/Right toggle the selected occurrence and Enter
//! shows its record in the file viewer. When the forest could not be built the
//! panel shows why instead.

use super::model::{FlattenedTreeNode, Model, NodeId, NodeKind};
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use std::cell::Cell;

fn get_node_icon(node: &FlattenedTreeNode) -> &'static str {
    match node.kind {
        NodeKind::File => "⧉",
        NodeKind::Cyclic => "↻",
        NodeKind::Record if node.has_children && !node.is_expanded => "▸",
        NodeKind::Record if node.has_children => "▾",
        NodeKind::Record => "◆",
    }
}

/// Tree viewer - displays and navigates the reference forest
#[derive(Debug, Default)]
pub struct TreeViewer {
    /// How many rows are scrolled off the top, adjusted while rendering
    scroll_offset: Cell<usize>,
}

impl TreeViewer {
    pub fn new() -> Self {
        TreeViewer {
            scroll_offset: Cell::new(0),
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset.get()
    }

    /// Get the next visible node in the flattened tree
    ///
    /// Returns None if already at the last node.
    pub fn get_next_visible_node(&self, current_node_id: &NodeId, model: &Model) -> Option<NodeId> {
        let flattened = model.flattened_tree();
        let current_index = flattened.iter().position(|n| &n.node_id == current_node_id)?;
        flattened
            .get(current_index + 1)
            .map(|node| node.node_id.clone())
    }

    /// Get the previous visible node in the flattened tree
    ///
    /// Returns None if already at the first node.
    pub fn get_previous_visible_node(
        &self,
        current_node_id: &NodeId,
        model: &Model,
    ) -> Option<NodeId> {
        let flattened = model.flattened_tree();
        let current_index = flattened.iter().position(|n| &n.node_id == current_node_id)?;
        let previous = current_index.checked_sub(1)?;
        Some(flattened[previous].node_id.clone())
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, title: &str, detail: String) {
        let paragraph = Paragraph::new(vec![
            Line::from(title.to_string())
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Line::from(detail),
        ])
        .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

impl Viewer for TreeViewer {
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model) {
        if !model.is_loaded() {
            let reason = model.unloaded_reason().unwrap_or("unknown reason");
            self.render_message(frame, area, "No document loaded", reason.to_string());
            return;
        }
        if let Some(err) = model.forest_error() {
            self.render_message(frame, area, "Forest unavailable", err.to_string());
            return;
        }

        let flattened = model.flattened_tree();
        let highlighted_node_id = model.highlighted_node_id();
        let highlighted_index = highlighted_node_id
            .as_ref()
            .and_then(|id| flattened.iter().position(|n| &n.node_id == id));

        // Keep the highlighted row inside the window
        let height = area.height as usize;
        let mut offset = self.scroll_offset.get().min(flattened.len().saturating_sub(1));
        if let Some(index) = highlighted_index {
            if index < offset {
                offset = index;
            } else if height > 0 && index >= offset + height {
                offset = index + 1 - height;
            }
        }
        self.scroll_offset.set(offset);

        let lines: Vec<Line> = flattened
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(index, node)| {
                let indent = "  ".repeat(node.depth);
                let icon = get_node_icon(node);

                let label_max_width = (area.width as usize)
                    .saturating_sub(indent.chars().count())
                    .saturating_sub(icon.chars().count())
                    .saturating_sub(1);
                let truncated_label: String = node.label.chars().take(label_max_width).collect();
                let text = format!("{}{} {}", indent, icon, truncated_label);

                let is_collapsed = !node.is_expanded && node.has_children;
                if Some(index) == highlighted_index {
                    let text_color = if is_collapsed {
                        Color::Gray
                    } else {
                        Color::White
                    };
                    Line::from(text).style(
                        Style::default()
                            .bg(Color::Blue)
                            .fg(text_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if node.kind == NodeKind::Cyclic {
                    Line::from(text).style(Style::default().fg(Color::Magenta))
                } else if is_collapsed {
                    Line::from(text)
                        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
                } else {
                    Line::from(text)
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent> {
        let flattened = model.flattened_tree();
        let Some(first) = flattened.first() else {
            return Some(ViewerEvent::NoChange);
        };

        // Nothing highlighted yet (cursor off any record): start from the top
        let Some(current) = model
            .highlighted_node_id()
            .filter(|id| flattened.iter().any(|n| &n.node_id == id))
        else {
            return match key.code {
                KeyCode::Up | KeyCode::Down => Some(ViewerEvent::SelectNode(first.node_id.clone())),
                _ => Some(ViewerEvent::NoChange),
            };
        };

        match key.code {
            KeyCode::Up => Some(
                self.get_previous_visible_node(&current, model)
                    .map_or(ViewerEvent::NoChange, ViewerEvent::SelectNode),
            ),
            KeyCode::Down => Some(
                self.get_next_visible_node(&current, model)
                    .map_or(ViewerEvent::NoChange, ViewerEvent::SelectNode),
            ),
            KeyCode::Left | KeyCode::Right => {
                let expandable = flattened
                    .iter()
                    .any(|n| n.node_id == current && n.has_children && !current.is_root());
                if expandable {
                    Some(ViewerEvent::ToggleNodeExpansion(current))
                } else {
                    Some(ViewerEvent::NoChange)
                }
            }
            KeyCode::Enter if !current.is_root() => Some(ViewerEvent::JumpToNode(current)),
            _ => Some(ViewerEvent::NoChange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use stepview_parser::step::parse_document;

    fn model_for(source: &str) -> Model {
        let settings = stepview_config::load_defaults().unwrap().viewer;
        Model::new(Arc::new(parse_document(source)), &settings)
    }

    fn render_lines(viewer: &TreeViewer, model: &Model, width: u16, height: u16) -> Vec<String> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                viewer.render(frame, area, model);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| {
                (0..width)
                    .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn press(viewer: &mut TreeViewer, code: KeyCode, model: &Model) -> Option<ViewerEvent> {
        viewer.handle_key(KeyEvent::new(code, KeyModifiers::empty()), model)
    }

    #[test]
    fn test_tree_viewer_creation() {
        let viewer = TreeViewer::new();
        assert_eq!(viewer.scroll_offset(), 0);
    }

    #[test]
    fn test_render_forest() {
        let model = model_for("#1=A(#2,#3);\n#2=B(#3);\n#3=C();");
        let lines = render_lines(&TreeViewer::new(), &model, 30, 5);
        assert_eq!(lines[0], "⧉ 3 records, 1 root");
        assert_eq!(lines[1], "  ▾ #1=A(#2,#3);");
        assert_eq!(lines[2], "    ▸ #2=B(#3);");
        assert_eq!(lines[3], "    ◆ #3=C();");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_label_truncation_with_indentation() {
        let source = format!("#1=A(#2);\n#2={}();", "B".repeat(50));
        let mut model = model_for(&source);
        model.expand_to_depth(2);
        for line in render_lines(&TreeViewer::new(), &model, 30, 5) {
            assert!(line.chars().count() <= 30, "line too long: '{line}'");
        }
    }

    #[test]
    fn test_unavailable_forest_shows_reason() {
        let model = model_for("#1=A(#99999999999999999999);");
        let lines = render_lines(&TreeViewer::new(), &model, 40, 4);
        assert_eq!(lines[0], "Forest unavailable");
        assert!(lines[1].starts_with("line 1: malformed reference"));
    }

    #[test]
    fn test_navigation_events() {
        let mut model = model_for("#1=A(#2);\n#2=B();");
        let mut viewer = TreeViewer::new();
        // text cursor on #1 highlights its occurrence
        assert_eq!(
            press(&mut viewer, KeyCode::Down, &model),
            Some(ViewerEvent::SelectNode(NodeId::new(&[0, 0])))
        );
        assert_eq!(
            press(&mut viewer, KeyCode::Up, &model),
            Some(ViewerEvent::SelectNode(NodeId::root()))
        );
        assert_eq!(
            press(&mut viewer, KeyCode::Left, &model),
            Some(ViewerEvent::ToggleNodeExpansion(NodeId::new(&[0])))
        );
        assert_eq!(
            press(&mut viewer, KeyCode::Enter, &model),
            Some(ViewerEvent::JumpToNode(NodeId::new(&[0])))
        );

        model.select_node(NodeId::root());
        assert_eq!(press(&mut viewer, KeyCode::Left, &model), Some(ViewerEvent::NoChange));
        assert_eq!(press(&mut viewer, KeyCode::Enter, &model), Some(ViewerEvent::NoChange));
    }

    #[test]
    fn test_scroll_follows_highlight() {
        let source = (1..=40)
            .map(|i| format!("#{i}=A();"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut model = model_for(&source);
        model.select_node(NodeId::new(&[30]));
        let viewer = TreeViewer::new();
        let lines = render_lines(&viewer, &model, 30, 10);
        // row 31 (file node is row 0) is the last visible one
        assert_eq!(viewer.scroll_offset(), 22);
        assert_eq!(lines[9], "  ◆ #31=A();");
    }
}
