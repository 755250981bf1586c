use std::path::{Path, PathBuf};

use tracing::debug;

use super::StubError;
use crate::{config::GenerationSettings, editor::Editor, vfs::normalized_path};

/// The files taking part in one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    /// Companion source file, if one exists or is open.
    pub source: Option<PathBuf>,
    /// Companion header file, if one exists or is open.
    pub header: Option<PathBuf>,
    /// The file being edited.
    pub input: PathBuf,
    /// The file that is parsed and receives the definition; always `source`
    /// or `header`.
    pub output: PathBuf,
}

impl FileSet {
    /// Pair `input` with its header and source.
    ///
    /// The source is the output unless it is missing or `force_inline` is
    /// set, in which case the header is.
    pub fn resolve(
        editor: &impl Editor,
        input: &Path,
        force_inline: bool,
        settings: &GenerationSettings,
    ) -> Result<Self, StubError> {
        let input = normalized_path(input);
        let header = companion(editor, &input, &settings.header_extensions);
        let source = companion(editor, &input, &settings.source_extensions);

        let output = match (&source, &header) {
            (Some(source), _) if !force_inline => source.clone(),
            (_, Some(header)) => header.clone(),
            _ => return Err(StubError::MissingCompanion(input)),
        };
        debug!(
            "[fileset] input={} header={:?} source={:?} output={}",
            input.display(),
            header,
            source,
            output.display()
        );

        Ok(Self {
            source,
            header,
            input,
            output,
        })
    }

    pub fn is_input_header(&self) -> bool {
        self.header.as_deref() == Some(self.input.as_path())
    }

    pub fn is_output_header(&self) -> bool {
        self.header.as_deref() == Some(self.output.as_path())
    }

    /// Header and source, whichever exist.
    pub fn companions(&self) -> impl Iterator<Item = &Path> {
        self.header.iter().chain(self.source.iter()).map(PathBuf::as_path)
    }
}

/// `path` itself when it already has one of `extensions`, otherwise the first
/// sibling with the same stem and one of `extensions` that is open or on disk.
fn companion(
    editor: &impl Editor,
    path: &Path,
    extensions: &[String],
) -> Option<PathBuf> {
    let current = path.extension().and_then(|ext| ext.to_str());
    if current.is_some_and(|ext| extensions.iter().any(|candidate| candidate.trim_start_matches('.') == ext)) {
        return Some(path.to_path_buf());
    }
    extensions
        .iter()
        .map(|ext| path.with_extension(ext.trim_start_matches('.')))
        .find(|candidate| editor.is_open(candidate) || editor.file_exists(candidate))
}

#[cfg(test)]
#[path = "../../tests/src/stub/fileset_tests.rs"]
mod tests;
