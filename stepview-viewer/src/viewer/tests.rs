//! Test infrastructure for stepv
//!
//! Provides utilities for testing the full application including:
//! - TestApp: wrapper driving the App against a ratatui TestBackend
//! - Keyboard helpers
//! - End-to-end tests of both panels and their synchronization

use super::app::App;
use super::model::{Focus, NodeId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::io::Write;
use std::path::{Path, PathBuf};
use stepview_config::ViewerConfig;
use stepview_parser::step::testing::{sample_line_of, CYCLIC_FILE, SAMPLE_EXCHANGE_FILE};
use stepview_parser::step::SplitMode;

const WIDTH: u16 = 100;
const HEIGHT: u16 = 24;

fn settings() -> ViewerConfig {
    stepview_config::load_defaults()
        .expect("defaults to deserialize")
        .viewer
}

/// Test application wrapper with test backend
pub struct TestApp {
    app: App,
    terminal: Terminal<TestBackend>,
}

impl TestApp {
    /// Create a test app over in-memory content
    pub fn with_content(content: &str) -> Self {
        let app = App::from_source(
            content,
            PathBuf::from("test.ifc"),
            SplitMode::Naive,
            settings(),
        );
        Self::wrap(app)
    }

    /// Create a test app that reads (and reloads) a real file
    pub fn with_file(path: &Path) -> Self {
        Self::wrap(App::open(path.to_path_buf(), SplitMode::Naive, settings()))
    }

    fn wrap(app: App) -> Self {
        let backend = TestBackend::new(WIDTH, HEIGHT);
        let terminal = Terminal::new(backend).expect("Failed to create terminal");
        TestApp { app, terminal }
    }

    /// Send a keyboard event and return the rendered output
    pub fn send_key(&mut self, code: KeyCode) -> String {
        self.send_key_with_modifiers(code, KeyModifiers::empty())
    }

    pub fn send_key_with_modifiers(&mut self, code: KeyCode, modifiers: KeyModifiers) -> String {
        let key = KeyEvent::new(code, modifiers);
        let _ = self.app.handle_key(key);
        self.render()
    }

    /// Send the same key several times
    pub fn send_keys(&mut self, code: KeyCode, times: usize) -> String {
        for _ in 0..times {
            let _ = self.app.handle_key(KeyEvent::new(code, KeyModifiers::empty()));
        }
        self.render()
    }

    /// Render the current application state and return output
    pub fn render(&mut self) -> String {
        self.terminal
            .draw(|frame| super::ui::render(frame, &self.app))
            .expect("Failed to draw");
        self.terminal_output()
    }

    fn terminal_output(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut output = String::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                match buffer.cell((x, y)) {
                    Some(cell) => output.push_str(cell.symbol()),
                    None => output.push(' '),
                }
            }
            output.push('\n');
        }
        output
    }

    /// One rendered row, trailing spaces removed
    pub fn row(&mut self, y: usize) -> String {
        self.render()
            .lines()
            .nth(y)
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.app.file_viewer.cursor_position()
    }
}

#[test]
fn test_initial_render() {
    let mut app = TestApp::with_content(SAMPLE_EXCHANGE_FILE);
    let output = app.render();
    assert!(output.starts_with("stepv:: test.ifc [naive]"));
    assert!(output.contains("Forest"));
    assert!(output.contains("File [FOCUSED]"));
    assert!(output.contains("⧉ 11 records, 1 root"));
    assert!(output.contains("ISO-10303-21;"));
    assert!(output.contains("#1=IFCPROJECT"));
    // status line
    assert!(app.row(23).starts_with("Text | Cursor: Line 1, Col 1"));
}

#[test]
fn test_quit_keys() {
    let mut app = TestApp::with_content("#1=A();");
    app.send_key(KeyCode::Char('x'));
    assert!(!app.app().should_quit);
    app.send_key(KeyCode::Char('q'));
    assert!(app.app().should_quit);

    let mut app = TestApp::with_content("#1=A();");
    app.send_key_with_modifiers(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(app.app().should_quit);
}

#[test]
fn test_tab_switches_focus() {
    let mut app = TestApp::with_content("#1=A();");
    let output = app.send_key(KeyCode::Tab);
    assert_eq!(app.app().focus, Focus::TreeViewer);
    assert!(output.contains("Forest [FOCUSED]"));
    app.send_key(KeyCode::Tab);
    assert_eq!(app.app().focus, Focus::FileViewer);
}

#[test]
fn test_file_cursor_mirrors_into_tree() {
    let mut app = TestApp::with_content(SAMPLE_EXCHANGE_FILE);
    // #4 sits under #1 -> #2 -> #4, collapsed at first
    app.send_keys(KeyCode::Down, sample_line_of(4));
    assert_eq!(app.cursor(), (sample_line_of(4), 0));
    let highlighted = app.app().model.highlighted_node_id();
    assert_eq!(highlighted, Some(NodeId::new(&[0, 0, 1])));
    // its ancestors were expanded so the occurrence is visible
    let output = app.render();
    assert!(output.contains("#4=IFCAPPLICATION"));
}

#[test]
fn test_tree_selection_mirrors_into_file() {
    let mut app = TestApp::with_content(SAMPLE_EXCHANGE_FILE);
    app.send_key(KeyCode::Tab);
    // cursor starts on a header line, so the first Down selects the file node
    app.send_key(KeyCode::Down);
    assert_eq!(app.app().model.get_selected_node_id(), Some(NodeId::root()));
    app.send_key(KeyCode::Down);
    assert_eq!(app.app().model.get_selected_node_id(), Some(NodeId::new(&[0])));
    assert_eq!(app.cursor(), (sample_line_of(1), 0));
    app.send_key(KeyCode::Down);
    assert_eq!(app.cursor(), (sample_line_of(2), 0));
    assert!(app.row(23).contains("Path: [0→0]"));
}

#[test]
fn test_tree_toggle_and_jump() {
    let mut app = TestApp::with_content(SAMPLE_EXCHANGE_FILE);
    app.send_key(KeyCode::Tab);
    app.send_keys(KeyCode::Down, 3);
    let selected = NodeId::new(&[0, 0]);
    assert_eq!(app.app().model.get_selected_node_id(), Some(selected.clone()));

    let output = app.send_key(KeyCode::Right);
    assert!(app.app().model.is_node_expanded(&selected));
    assert!(output.contains("#3=IFCPERSONANDORGANIZATION"));
    app.send_key(KeyCode::Left);
    assert!(!app.app().model.is_node_expanded(&selected));

    app.send_key(KeyCode::Enter);
    assert_eq!(app.app().focus, Focus::FileViewer);
    assert_eq!(app.cursor(), (sample_line_of(2), 0));
    assert_eq!(app.app().model.flashed_line(), Some(sample_line_of(2)));
}

#[test]
fn test_enter_on_reference_navigates() {
    let mut app = TestApp::with_content(SAMPLE_EXCHANGE_FILE);
    app.send_keys(KeyCode::Down, sample_line_of(9));
    // #9=IFCAXIS2PLACEMENT3D(#11,$,$); the reference starts after the '('
    let col = "#9=IFCAXIS2PLACEMENT3D(".len();
    app.send_keys(KeyCode::Right, col);
    assert!(app.row(23).contains("Token: reference #11"));

    app.send_key(KeyCode::Enter);
    assert_eq!(app.cursor(), (sample_line_of(11), 0));
    assert_eq!(app.app().model.flashed_line(), Some(sample_line_of(11)));
    assert_eq!(
        app.app().model.highlighted_node_id(),
        Some(NodeId::new(&[0, 1, 0, 0]))
    );
}

#[test]
fn test_enter_on_dangling_reference_reports() {
    let mut app = TestApp::with_content("#1=A(#404);");
    app.send_keys(KeyCode::Right, 6);
    app.send_key(KeyCode::Enter);
    assert_eq!(app.cursor(), (0, 6));
    assert_eq!(app.row(23), "#404 is not declared in this file");
}

#[test]
fn test_navigation_centers_long_files() {
    let mut source = String::from("#1=A(#200);\n");
    for i in 2..=200 {
        source.push_str(&format!("#{i}=B();\n"));
    }
    let mut app = TestApp::with_content(&source);
    app.send_keys(KeyCode::Right, 6);
    let output = app.send_key(KeyCode::Enter);
    assert_eq!(app.cursor(), (199, 0));
    // 20 visible rows: the target lands in the middle, not at the edge
    assert_eq!(app.app().file_viewer.scroll_offset(), 189);
    // gutter is 3 wide for 201 lines
    assert!(output.contains("200 #200=B();"));
    assert!(!output.contains("  1 #1=A(#200);"));
}

#[test]
fn test_cycles_render_finitely() {
    let mut app = TestApp::with_content(CYCLIC_FILE);
    app.send_key(KeyCode::Tab);
    // the cursor on line 0 highlights #1 under #3; expand it, then #2 below it
    assert_eq!(
        app.app().model.highlighted_node_id(),
        Some(NodeId::new(&[0, 0]))
    );
    app.send_key(KeyCode::Right);
    app.send_key(KeyCode::Down);
    let output = app.send_key(KeyCode::Right);
    assert!(output.contains("↻ #1=A(#2);"));
    // the cyclic occurrence is a leaf
    app.send_key(KeyCode::Down);
    assert_eq!(
        app.app().model.get_selected_node_id(),
        Some(NodeId::new(&[0, 0, 0, 0]))
    );
    app.send_key(KeyCode::Right);
    assert!(!app
        .app()
        .model
        .is_node_expanded(&NodeId::new(&[0, 0, 0, 0])));
}

#[test]
fn test_unavailable_forest_keeps_file_view() {
    let mut app = TestApp::with_content("#1=A(#99999999999999999999);\n#2=B();");
    let output = app.render();
    assert!(output.contains("Forest unavailable"));
    assert!(output.contains("#2=B();"));
    app.send_key(KeyCode::Down);
    assert_eq!(app.cursor(), (1, 0));
}

#[test]
fn test_reload_picks_up_changes_and_failures() {
    let mut file = tempfile::Builder::new()
        .suffix(".ifc")
        .tempfile()
        .expect("temp file");
    write!(file, "#1=A();").expect("write");
    let mut app = TestApp::with_file(file.path());
    assert!(app.render().contains("⧉ 1 record, 1 root"));

    std::fs::write(file.path(), "#1=A(#2);\n#2=B();").expect("rewrite");
    let output = app.send_key(KeyCode::Char('r'));
    assert!(output.contains("⧉ 2 records, 1 root"));
    assert!(app.row(23).starts_with("Reloaded"));

    let path = file.path().to_path_buf();
    drop(file);
    let output = app.send_key(KeyCode::Char('r'));
    assert!(!app.app().model.is_loaded());
    assert!(output.contains("No document loaded"));
    assert!(app.row(23).starts_with("Reload failed"));
    // the status message goes away, the unloaded state stays
    app.send_key(KeyCode::Down);
    assert!(app.row(23).starts_with("Unloaded"));

    std::fs::write(&path, "#5=E();").expect("recreate");
    app.send_key(KeyCode::Char('r'));
    assert!(app.app().model.is_loaded());
    assert!(app.render().contains("#5=E();"));
    std::fs::remove_file(&path).expect("cleanup");
}

#[test]
fn test_open_unreadable_file() {
    let mut app = TestApp::with_file(Path::new("/no/such/dir/file.ifc"));
    let output = app.render();
    assert!(output.contains("No document loaded"));
    assert!(output.contains("failed to read"));
}

#[test]
fn test_narrow_terminal() {
    let app = App::from_source("#1=A();", PathBuf::from("t.ifc"), SplitMode::Naive, settings());
    let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
    terminal
        .draw(|frame| super::ui::render(frame, &app))
        .unwrap();
    let first_row: String = (0..40)
        .filter_map(|x| terminal.backend().buffer().cell((x, 0)).map(|c| c.symbol().to_string()))
        .collect();
    assert!(first_row.starts_with("Terminal too narrow: 40 < 60 chars"));
}
