//! Session: the currently loaded document
//!
//! A session owns at most one [Document]. Loading builds a complete new document and
//! swaps it in atomically, so readers holding an `Arc<Document>` never observe a
//! half-built index or forest. A failed load leaves the session unloaded: the previous
//! document is dropped, not kept.

use super::document::Document;
use super::error::LoadError;
use super::lexing::SplitMode;
use arc_swap::ArcSwapOption;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Session {
    current: ArcSwapOption<Document>,
    split_mode: SplitMode,
}

impl Session {
    pub fn new(split_mode: SplitMode) -> Self {
        Session {
            current: ArcSwapOption::empty(),
            split_mode,
        }
    }

    pub fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    /// Load text, replacing whatever was loaded before
    pub fn load(&self, source: &str) -> Arc<Document> {
        let document = Arc::new(Document::parse(source, self.split_mode));
        self.current.store(Some(document.clone()));
        document
    }

    /// Load raw bytes. Invalid UTF-8 unloads the session.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Arc<Document>, LoadError> {
        match Document::from_bytes(bytes, self.split_mode) {
            Ok(document) => {
                let document = Arc::new(document);
                self.current.store(Some(document.clone()));
                Ok(document)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Read and load a file. A read or decoding failure unloads the session.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Arc<Document>, LoadError> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) => {
                return self.fail(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let document = self.load_bytes(&bytes)?;
        info!(
            path = %path.display(),
            lines = document.line_count(),
            records = document.index().len(),
            "loaded file"
        );
        Ok(document)
    }

    /// The loaded document, if any
    pub fn current(&self) -> Option<Arc<Document>> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Drop the loaded document
    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Navigation query against the loaded document
    pub fn lookup(&self, identifier: u64) -> Option<usize> {
        self.current.load_full()?.lookup(identifier)
    }

    fn fail(&self, err: LoadError) -> Result<Arc<Document>, LoadError> {
        warn!(%err, "load failed, session cleared");
        self.clear();
        Err(err)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SplitMode::default())
    }
}
