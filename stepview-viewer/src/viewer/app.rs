//! Main application state and event handling
//!
//! The App struct brings together:
//! - The Session that loads (and reloads) the file
//! - Model (the application state)
//! - FileViewer and TreeViewer (the UI components)
//! - Focus management and global keys (quit, focus switching, reload)

use super::fileviewer::FileViewer;
use super::model::{Focus, Model, NodeId, Selection};
use super::treeviewer::TreeViewer;
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use stepview_config::ViewerConfig;
use stepview_parser::step::{Session, SplitMode};
use tracing::{info, warn};

/// The main application
pub struct App {
    /// The model holding document and selection state
    pub model: Model,

    /// File viewer (shows tokenized lines)
    pub file_viewer: FileViewer,

    /// Tree viewer (shows the reference forest)
    pub tree_viewer: TreeViewer,

    /// Which viewer currently has focus
    pub focus: Focus,

    /// Whether the app should quit
    pub should_quit: bool,

    session: Session,
    path: PathBuf,
    settings: ViewerConfig,
    /// One-shot message for the status line, cleared by the next key
    status: Option<String>,
}

impl App {
    /// Load `path` and build the application around it.
    ///
    /// A failed load is not fatal: the app starts unloaded and `r` retries.
    pub fn open(path: PathBuf, split_mode: SplitMode, settings: ViewerConfig) -> Self {
        let session = Session::new(split_mode);
        let model = match session.load_file(&path) {
            Ok(document) => Model::new(document, &settings),
            Err(err) => Model::unloaded(err.to_string(), &settings),
        };
        Self::with_model(session, path, settings, model)
    }

    /// Build an app over in-memory source, as if read from `path`
    #[cfg(test)]
    pub fn from_source(
        source: &str,
        path: PathBuf,
        split_mode: SplitMode,
        settings: ViewerConfig,
    ) -> Self {
        let session = Session::new(split_mode);
        let model = Model::new(session.load(source), &settings);
        Self::with_model(session, path, settings, model)
    }

    fn with_model(session: Session, path: PathBuf, settings: ViewerConfig, model: Model) -> Self {
        App {
            model,
            file_viewer: FileViewer::new(),
            tree_viewer: TreeViewer::new(),
            focus: Focus::default(),
            should_quit: false,
            session,
            path,
            settings,
            status: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn settings(&self) -> &ViewerConfig {
        &self.settings
    }

    pub fn split_mode(&self) -> SplitMode {
        self.session.split_mode()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Read the file again and swap the new snapshot in.
    ///
    /// On failure the session and the model both end up unloaded.
    pub fn reload(&mut self) {
        match self.session.load_file(&self.path) {
            Ok(document) => {
                let lines = document.line_count();
                self.model.replace_document(document);
                if let Some((row, col)) = self.model.get_selected_position() {
                    self.file_viewer.sync_cursor_to_position(row, col, &self.model);
                } else {
                    self.file_viewer.reset();
                }
                info!(path = %self.path.display(), lines, "reloaded");
                self.status = Some(format!("Reloaded {} ({} lines)", self.file_name(), lines));
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "reload failed");
                self.model.unload(err.to_string());
                self.file_viewer.reset();
                self.status = Some(format!("Reload failed: {err}"));
            }
        }
    }

    /// Handle a keyboard event
    ///
    /// Returns whether the state changed (needed for re-rendering)
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status = None;

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('r') if key.modifiers.is_empty() => {
                self.reload();
                return true;
            }
            KeyCode::Tab => {
                self.toggle_focus();
                return true;
            }
            _ => {}
        }

        let event = match self.focus {
            Focus::FileViewer => self.file_viewer.handle_key(key, &self.model),
            Focus::TreeViewer => self.tree_viewer.handle_key(key, &self.model),
        };

        if let Some(event) = event {
            self.process_viewer_event(event)
        } else {
            false
        }
    }

    /// Process a viewer event and update the model
    fn process_viewer_event(&mut self, event: ViewerEvent) -> bool {
        match event {
            ViewerEvent::SelectNode(node_id) => {
                self.select_node(node_id);
                true
            }
            ViewerEvent::SelectPosition(row, col) => {
                self.model.select_position(row, col);
                self.expand_to_position(row, col);
                self.sync_viewers_after_selection();
                true
            }
            ViewerEvent::ToggleNodeExpansion(node_id) => {
                self.model.toggle_node_expansion(&node_id);
                true
            }
            ViewerEvent::JumpToNode(node_id) => {
                let Some(line) = self.model.get_line_for_node(&node_id) else {
                    return false;
                };
                self.select_node(node_id);
                self.file_viewer.center_on(line, &self.model);
                self.model.flash_line(line);
                self.focus = Focus::FileViewer;
                true
            }
            ViewerEvent::FollowReference(identifier) => {
                match self.model.document().and_then(|doc| doc.lookup(identifier)) {
                    Some(line) => self.navigate_to_line(line),
                    None => {
                        self.status = Some(format!("#{identifier} is not declared in this file"));
                    }
                }
                true
            }
            ViewerEvent::NoChange => false,
        }
    }

    fn select_node(&mut self, node_id: NodeId) {
        let ancestors = self.model.get_ancestors(&node_id);
        self.model.expand_nodes(&ancestors);
        self.model.select_node(node_id);
        self.sync_viewers_after_selection();
    }

    /// Put the text cursor on `line`, centered and flashed, and reveal it in the tree
    fn navigate_to_line(&mut self, line: usize) {
        self.model.select_position(line, 0);
        self.expand_to_position(line, 0);
        self.file_viewer.center_on(line, &self.model);
        self.model.flash_line(line);
    }

    /// Auto-expand the ancestors of the occurrence at a text position
    fn expand_to_position(&mut self, row: usize, col: usize) {
        if let Some(node_id) = self.model.get_node_at_position(row, col) {
            let ancestors = self.model.get_ancestors(&node_id);
            self.model.expand_nodes(&ancestors);
        }
    }

    /// Synchronize viewer states after a selection change
    ///
    /// The TreeViewer needs no explicit sync: it highlights from the model selection
    /// while rendering.
    fn sync_viewers_after_selection(&mut self) {
        match self.model.selection().clone() {
            Selection::TreeSelection(node_id) => {
                if let Some(line) = self.model.get_line_for_node(&node_id) {
                    self.file_viewer.sync_cursor_to_position(line, 0, &self.model);
                }
            }
            Selection::TextSelection(row, col) => {
                self.file_viewer.sync_cursor_to_position(row, col, &self.model);
            }
        }
    }
}
