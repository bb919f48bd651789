//! Viewer trait, event types and the terminal run loop
//!
//! The Viewer trait defines a common interface for UI components that:
//! - Render themselves given a model and area
//! - Handle keyboard input and return events
//!
//! This abstraction allows the FileViewer and TreeViewer to be treated uniformly
//! by the main App.

use super::app::App;
use super::model::{Model, NodeId};
use super::ui;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use stepview_config::StepviewConfig;

/// Events that can be emitted by viewers
///
/// These represent model changes that should be applied after handling input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Select a forest occurrence
    SelectNode(NodeId),
    /// Select a text position
    SelectPosition(usize, usize),
    /// Toggle whether an occurrence is expanded
    ToggleNodeExpansion(NodeId),
    /// Show the record of an occurrence in the file viewer
    JumpToNode(NodeId),
    /// Navigate to the record declaring this identifier
    FollowReference(u64),
    /// No change to model
    NoChange,
}

/// Trait for UI viewers
///
/// A viewer is a component that:
/// - Knows how to render itself given a model
/// - Knows how to interpret keyboard input
/// - Emits ViewerEvents when user interactions require model changes
pub trait Viewer {
    /// Render this viewer to the given area
    fn render(&self, frame: &mut Frame, area: Rect, model: &Model);

    /// Handle a keyboard event and return the resulting event
    fn handle_key(&mut self, key: KeyEvent, model: &Model) -> Option<ViewerEvent>;
}

/// Run the viewer for the given file path
///
/// A file that cannot be read still opens the viewer, in the unloaded state.
pub fn run_viewer(file_path: PathBuf, config: &StepviewConfig) -> io::Result<()> {
    let mut app = App::open(
        file_path,
        config.tokenizer.split_mode,
        config.viewer.clone(),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // The timeout also lets an expired flash highlight disappear
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    if app.should_quit {
                        return Ok(());
                    }
                }
                // The next draw() picks up the new dimensions
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
}
