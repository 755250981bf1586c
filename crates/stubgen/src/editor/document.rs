use std::path::PathBuf;

use tower_lsp::lsp_types::TextDocumentContentChangeEvent;

use crate::text_pos::byte_offset_from_position;

// ── Document ────────────────────────────────────────────────────────────────

/// Snapshot of a single open buffer.
#[derive(Debug, Clone)]
pub struct Document {
    /// Normalized file path of the buffer.
    pub path: PathBuf,
    /// Full buffer text (always kept up-to-date).
    pub text: String,
    /// Bumped on every mutation.
    pub version: i32,
    /// Pre-computed line start byte offsets (rebuilt on every mutation).
    line_offsets: Vec<usize>,
}

impl Document {
    pub fn new(
        path: PathBuf,
        text: String,
        version: i32,
    ) -> Self {
        let line_offsets = Self::compute_line_offsets(&text);
        Self {
            path,
            text,
            version,
            line_offsets,
        }
    }

    // ── queries ─────────────────────────────────────────────────────────

    /// Number of lines, not counting the empty remainder after a final newline.
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else if self.text.ends_with('\n') {
            self.line_offsets.len() - 1
        } else {
            self.line_offsets.len()
        }
    }

    /// Return the full text of a given 0-based line (without the trailing newline).
    pub fn line_text(
        &self,
        line: usize,
    ) -> Option<&str> {
        if line >= self.line_count() {
            return None;
        }
        let start = *self.line_offsets.get(line)?;
        let end = self.line_offsets.get(line + 1).copied().unwrap_or(self.text.len());
        let slice = &self.text[start..end];
        Some(slice.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// All lines, as an editor would list them.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).filter_map(|line| self.line_text(line)).map(str::to_owned).collect()
    }

    // ── mutations ───────────────────────────────────────────────────────

    /// Replace the full content and bump version.
    pub fn set_content(
        &mut self,
        text: String,
        version: i32,
    ) {
        self.text = text;
        self.version = version;
        self.line_offsets = Self::compute_line_offsets(&self.text);
    }

    /// Apply LSP content changes in order; ranges that no longer fit the
    /// text are dropped.
    pub fn apply_changes(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = byte_offset_from_position(&self.text, range.start);
                    let end = byte_offset_from_position(&self.text, range.end);
                    if let (Some(start), Some(end)) = (start, end)
                        && start <= end
                    {
                        self.text.replace_range(start..end, &change.text);
                    }
                },
                None => self.text = change.text,
            }
        }
        self.version = version;
        self.line_offsets = Self::compute_line_offsets(&self.text);
    }

    /// Splice `lines` in before the 0-based `index` (clamped to the end).
    pub fn insert_lines(
        &mut self,
        index: usize,
        lines: &[String],
    ) {
        let mut all = self.lines();
        let index = index.min(all.len());
        all.splice(index..index, lines.iter().cloned());

        let mut text = all.join("\n");
        if self.text.ends_with('\n') || self.text.is_empty() {
            text.push('\n');
        }
        let version = self.version + 1;
        self.set_content(text, version);
    }

    // ── internal helpers ────────────────────────────────────────────────

    fn compute_line_offsets(text: &str) -> Vec<usize> {
        let mut offsets = vec![0usize];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(i + 1);
            }
        }
        offsets
    }
}

#[cfg(test)]
#[path = "../../tests/src/editor/document_tests.rs"]
mod tests;
