//! Editor glue: the buffer/cursor operations the generator needs, and an
//! in-memory [`Workspace`] implementing them for the CLI, the language
//! server and tests.

pub(crate) mod document;
pub(crate) mod document_store;
mod workspace;

use std::path::{Path, PathBuf};

pub use document::Document;
pub use document_store::DocumentStore;
pub use workspace::{ModifiedBuffer, Workspace};

use crate::stub::StubError;

/// What the generator may ask of, and do to, the editor.
///
/// Lines are 1-based for cursor positions; `insert_lines` takes a 0-based
/// index, like splicing into a list of lines.
pub trait Editor {
    fn current_file_name(&self) -> PathBuf;

    /// Cursor as 1-based `(line, column)`.
    fn cursor_position(&self) -> (u32, u32);

    /// Lines of an open buffer; `None` when the file is not open.
    fn buffer_lines(
        &self,
        path: &Path,
    ) -> Option<Vec<String>>;

    fn list_open_buffers(&self) -> Vec<PathBuf>;

    /// Insert `lines` so the first of them ends up at 0-based `index`.
    fn insert_lines(
        &mut self,
        path: &Path,
        index: usize,
        lines: &[String],
    ) -> Result<(), StubError>;

    /// Make `path` the current buffer, loading it from disk if needed.
    fn switch_or_open_buffer(
        &mut self,
        path: &Path,
    ) -> Result<(), StubError>;

    /// Move the cursor to a 1-based line of the current buffer.
    fn move_cursor(
        &mut self,
        line: u32,
    );

    fn is_open(
        &self,
        path: &Path,
    ) -> bool {
        self.list_open_buffers().iter().any(|open| open == path)
    }

    fn file_exists(
        &self,
        path: &Path,
    ) -> bool {
        path.exists()
    }
}
