use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{Document, DocumentStore, Editor};
use crate::{stub::StubError, vfs::normalized_path};

/// A buffer whose text differs from what it was when the workspace opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedBuffer {
    pub path: PathBuf,
    pub original: String,
    pub text: String,
}

/// In-memory editor state: open buffers overlaid on the files on disk.
///
/// Open buffers always win over disk contents. Every buffer the generator
/// mutates remembers its original text, so callers can either save the
/// results or turn them into edits for a real editor.
#[derive(Debug)]
pub struct Workspace {
    store: DocumentStore,
    current: PathBuf,
    cursor: (u32, u32),
    originals: HashMap<PathBuf, String>,
}

impl Workspace {
    /// Create a workspace editing `current` with the cursor at 1-based `(line, col)`.
    pub fn new(
        current: impl AsRef<Path>,
        cursor: (u32, u32),
    ) -> Self {
        Self {
            store: DocumentStore::new(),
            current: normalized_path(current.as_ref()),
            cursor,
            originals: HashMap::new(),
        }
    }

    /// Seed a workspace with the buffers of an editor session.
    pub fn from_documents(
        current: impl AsRef<Path>,
        cursor: (u32, u32),
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        let workspace = Self::new(current, cursor);
        for doc in documents {
            workspace.store.open(&doc.path, doc.text, doc.version);
        }
        workspace
    }

    /// Register an unsaved buffer.
    pub fn open_buffer(
        &mut self,
        path: impl AsRef<Path>,
        text: impl Into<String>,
    ) {
        self.store.open(path.as_ref(), text.into(), 0);
    }

    /// Open `path` from disk unless it is already open.
    pub fn open_from_disk(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), StubError> {
        let path = path.as_ref();
        if !self.store.contains(path) {
            let text = std::fs::read_to_string(path)?;
            self.store.open(path, text, 0);
        }
        Ok(())
    }

    pub fn text(
        &self,
        path: impl AsRef<Path>,
    ) -> Option<String> {
        self.store.get_content(path.as_ref())
    }

    /// Buffers changed since they were opened, in path order.
    pub fn modified(&self) -> Vec<ModifiedBuffer> {
        let mut modified: Vec<ModifiedBuffer> = self
            .originals
            .iter()
            .filter_map(|(path, original)| {
                let text = self.store.get_content(path)?;
                (text != *original).then(|| ModifiedBuffer {
                    path: path.clone(),
                    original: original.clone(),
                    text,
                })
            })
            .collect();
        modified.sort_by(|a, b| a.path.cmp(&b.path));
        modified
    }

    /// Write every modified buffer back to disk.
    pub fn save_modified(&self) -> Result<Vec<PathBuf>, StubError> {
        let mut saved = Vec::new();
        for buffer in self.modified() {
            std::fs::write(&buffer.path, &buffer.text)?;
            debug!("saved {}", buffer.path.display());
            saved.push(buffer.path);
        }
        Ok(saved)
    }
}

impl Editor for Workspace {
    fn current_file_name(&self) -> PathBuf {
        self.current.clone()
    }

    fn cursor_position(&self) -> (u32, u32) {
        self.cursor
    }

    fn buffer_lines(
        &self,
        path: &Path,
    ) -> Option<Vec<String>> {
        self.store.get(path).map(|doc| doc.lines())
    }

    fn list_open_buffers(&self) -> Vec<PathBuf> {
        self.store.all_paths()
    }

    fn insert_lines(
        &mut self,
        path: &Path,
        index: usize,
        lines: &[String],
    ) -> Result<(), StubError> {
        self.open_from_disk(path)?;
        let key = normalized_path(path);
        if !self.originals.contains_key(&key) {
            let original = self.store.get_content(&key).unwrap_or_default();
            self.originals.insert(key.clone(), original);
        }
        self.store.insert_lines(&key, index, lines);
        Ok(())
    }

    fn switch_or_open_buffer(
        &mut self,
        path: &Path,
    ) -> Result<(), StubError> {
        self.open_from_disk(path)?;
        self.current = normalized_path(path);
        Ok(())
    }

    fn move_cursor(
        &mut self,
        line: u32,
    ) {
        self.cursor = (line, 1);
    }

    fn is_open(
        &self,
        path: &Path,
    ) -> bool {
        self.store.contains(path)
    }
}

#[cfg(test)]
#[path = "../../tests/src/editor/workspace_tests.rs"]
mod tests;
