use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tower_lsp::lsp_types::TextDocumentContentChangeEvent;

use super::Document;
use crate::vfs::normalized_path;

/// Thread-safe store of all open buffers, keyed by normalized path.
///
/// Uses `DashMap` internally so the language server can update it from any
/// async task while a blocking generation job snapshots it.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<PathBuf, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (register) a buffer.
    pub fn open(
        &self,
        path: &Path,
        text: String,
        version: i32,
    ) {
        let path = normalized_path(path);
        self.documents.insert(path.clone(), Document::new(path, text, version));
    }

    /// Replace the full content of a buffer, opening it if it is unknown.
    pub fn update(
        &self,
        path: &Path,
        text: String,
        version: i32,
    ) {
        let path = normalized_path(path);
        if let Some(mut doc) = self.documents.get_mut(&path) {
            doc.set_content(text, version);
        } else {
            self.documents.insert(path.clone(), Document::new(path, text, version));
        }
    }

    /// Apply incremental edits to a tracked buffer.
    pub fn apply_changes(
        &self,
        path: &Path,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        if let Some(mut doc) = self.documents.get_mut(&normalized_path(path)) {
            doc.apply_changes(changes, version);
        }
    }

    /// Close (unregister) a buffer.
    pub fn close(
        &self,
        path: &Path,
    ) {
        self.documents.remove(&normalized_path(path));
    }

    /// Return a clone of the full buffer text, if the path is tracked.
    pub fn get_content(
        &self,
        path: &Path,
    ) -> Option<String> {
        self.documents.get(&normalized_path(path)).map(|r| r.value().text.clone())
    }

    /// Return a clone of the full `Document`, if the path is tracked.
    pub fn get(
        &self,
        path: &Path,
    ) -> Option<Document> {
        self.documents.get(&normalized_path(path)).map(|r| r.value().clone())
    }

    pub fn contains(
        &self,
        path: &Path,
    ) -> bool {
        self.documents.contains_key(&normalized_path(path))
    }

    /// Splice lines into a tracked buffer. Returns `false` if it is not open.
    pub fn insert_lines(
        &self,
        path: &Path,
        index: usize,
        lines: &[String],
    ) -> bool {
        match self.documents.get_mut(&normalized_path(path)) {
            Some(mut doc) => {
                doc.insert_lines(index, lines);
                true
            },
            None => false,
        }
    }

    /// Return all currently open paths.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        self.documents.iter().map(|r| r.key().clone()).collect()
    }

    /// Clone every open buffer.
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.iter().map(|r| r.value().clone()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src/editor/document_store_tests.rs"]
mod tests;
