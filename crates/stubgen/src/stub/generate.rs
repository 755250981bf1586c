//! Editor-facing commands.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::{
    AccessorKind, DefinitionIndex, FileSet, InsertionPoint, StubError, accessor_name, build_accessor,
    build_declaration, display_name, following_declarations, lexical_namespaces, namespace_chain,
    namespace_qualification, resolve_field, resolve_function, resolve_placement,
};
use crate::{
    ast::{AstParser, Cursor, Overlay, TranslationUnit},
    config::GenerationSettings,
    editor::Editor,
    vfs::normalized_path,
};

static INCLUDE_GUARD_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#\s*endif\b").expect("include guard pattern is valid"));

/// A synthesized definition that has not been written anywhere yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    /// Signature, empty body with one blank line, and a trailing blank line.
    pub text: String,
    pub point: InsertionPoint,
}

impl Stub {
    pub fn lines(&self) -> Vec<String> {
        self.text.split('\n').map(str::to_owned).collect()
    }
}

/// Text that was inserted into a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub file: PathBuf,
    /// 1-based line of the first inserted line.
    pub line: u32,
    /// 1-based line the cursor was moved to.
    pub cursor_line: u32,
    pub lines: Vec<String>,
}

#[derive(Debug)]
pub struct LineFailure {
    pub line: u32,
    pub error: StubError,
}

/// Outcome of a line range sweep.
#[derive(Debug, Default)]
pub struct RangeReport {
    /// In the order they were made.
    pub insertions: Vec<Insertion>,
    /// Lines without a declaration of their own.
    pub skipped: Vec<u32>,
    pub failures: Vec<LineFailure>,
}

/// Builds the definition stub for `decl` and decides where it goes.
///
/// Fails with [`StubError::AlreadyDefined`] when the output file already
/// defines `decl`, unless `force` is set.
pub fn generate_method_stub<U: TranslationUnit>(
    unit: &U,
    decl: &U::Cursor,
    files: &FileSet,
    force: bool,
) -> Result<Stub, StubError> {
    let definitions = DefinitionIndex::build(unit, &files.output, decl);
    if let Some(existing) = definitions.find(decl) {
        let loc = existing.location();
        if !force {
            return Err(StubError::AlreadyDefined {
                name: display_name(decl),
                file: loc.as_ref().map_or_else(|| files.output.clone(), |loc| loc.file.clone()),
                line: loc.map_or(0, |loc| loc.line),
            });
        }
        debug!("[generate] '{}' is already defined, generating anyway", decl.spelling());
    }

    let header = files.header.clone().or_else(|| decl.file()).unwrap_or_else(|| files.input.clone());
    let following = following_declarations(decl, &header);
    let lexical = lexical_namespaces(unit, decl, &files.output);
    let placement = resolve_placement(&following, &definitions, &lexical);
    let qualification = namespace_qualification(&namespace_chain(decl), &placement.scope);
    let signature = build_declaration(decl, files.is_output_header(), &qualification);

    Ok(Stub {
        text: format!("{signature}\n{{\n \n}}\n "),
        point: placement.point,
    })
}

/// Runs the generation commands against an editor.
#[derive(Debug, Clone)]
pub struct Generator<P> {
    parser: P,
    settings: GenerationSettings,
}

impl<P: AstParser> Generator<P> {
    pub fn new(
        parser: P,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            parser,
            settings,
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Generate the definition of the function under the cursor.
    pub fn generate_at_cursor(
        &self,
        editor: &mut impl Editor,
        force_inline: bool,
        force_overwrite: bool,
    ) -> Result<Insertion, StubError> {
        let input = editor.current_file_name();
        let (line, col) = editor.cursor_position();
        let files = self.definition_files(&*editor, &input, force_inline)?;
        let unit = self.parse(&*editor, &files)?;

        let text = line_text(&*editor, &files.input, line);
        let decl = resolve_function(&unit, &files.input, line, col, text.as_deref()).ok_or_else(|| {
            StubError::NoDeclarationFound {
                file: files.input.clone(),
                line,
            }
        })?;
        debug!("[generate] resolved '{}' at {}:{line}", decl.spelling(), files.input.display());

        let stub = generate_method_stub(&unit, &decl, &files, force_overwrite)?;
        self.write_stub(editor, &files, &stub)
    }

    /// Generate definitions for every declaration on lines `start..=end`.
    ///
    /// Lines are independent: a failure is recorded and the sweep goes on.
    /// The output is parsed again after every insertion.
    pub fn generate_for_line_range(
        &self,
        editor: &mut impl Editor,
        start: u32,
        end: u32,
        force_inline: bool,
        force_overwrite: bool,
    ) -> Result<RangeReport, StubError> {
        let input = editor.current_file_name();
        let files = self.definition_files(&*editor, &input, force_inline)?;
        let mut unit = self.parse(&*editor, &files)?;
        let mut report = RangeReport::default();

        let (mut first, mut line, mut last) = (start, start, end);
        while line <= last {
            let text = line_text(&*editor, &files.input, line);
            let Some(decl) = resolve_function(&unit, &files.input, line, 1, text.as_deref()) else {
                report.skipped.push(line);
                line += 1;
                continue;
            };
            // A declaration spanning several lines is generated on its first line.
            if decl.extent().is_some_and(|extent| extent.start.line < line && extent.start.line >= first) {
                report.skipped.push(line);
                line += 1;
                continue;
            }

            let written = generate_method_stub(&unit, &decl, &files, force_overwrite)
                .and_then(|stub| self.write_stub(editor, &files, &stub));
            match written {
                Ok(insertion) => {
                    if insertion.file == files.input && insertion.line <= line {
                        let shift = insertion.lines.len() as u32;
                        first += shift;
                        line += shift;
                        last += shift;
                    }
                    report.insertions.push(insertion);
                    match self.parse(&*editor, &files) {
                        Ok(next) => unit = next,
                        Err(error) => {
                            warn!("[generate] re-parse failed, stopping at line {line}: {error}");
                            report.failures.push(LineFailure {
                                line,
                                error,
                            });
                            break;
                        },
                    }
                },
                Err(error) => {
                    debug!("[generate] line {line}: {error}");
                    report.failures.push(LineFailure {
                        line,
                        error,
                    });
                },
            }
            line += 1;
        }

        info!(
            "[generate] range {start}-{end}: {} inserted, {} skipped, {} failed",
            report.insertions.len(),
            report.skipped.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Declare the getter and/or setter of the data member under the cursor,
    /// directly below it.
    pub fn generate_accessors_at_cursor(
        &self,
        editor: &mut impl Editor,
    ) -> Result<Insertion, StubError> {
        let input = normalized_path(&editor.current_file_name());
        let (line, col) = editor.cursor_position();

        let mut paths = vec![input.clone()];
        if let Ok(files) = FileSet::resolve(&*editor, &input, true, &self.settings) {
            paths.extend(files.companions().map(Path::to_path_buf));
        }
        let unit = self.parser.parse(&input, &collect_overlays(&*editor, &paths))?;

        let text = line_text(&*editor, &input, line);
        let field = resolve_field(&unit, &input, line, col, text.as_deref()).ok_or_else(|| {
            StubError::NoDeclarationFound {
                file: input.clone(),
                line,
            }
        })?;

        let methods: Vec<_> = field
            .semantic_parent()
            .map(|record| record.children().into_iter().filter(|child| child.kind().is_function()).collect())
            .unwrap_or_default();

        let wanted = [(self.settings.getter, AccessorKind::Getter), (self.settings.setter, AccessorKind::Setter)];
        let mut declarations = Vec::new();
        let mut existing = None;
        for (enabled, kind) in wanted {
            if !enabled {
                continue;
            }
            let name = accessor_name(&field, kind);
            match methods.iter().find(|method| method.spelling() == name) {
                Some(method) => {
                    debug!("[accessor] '{name}' already declared");
                    existing.get_or_insert((name, method.location()));
                },
                None => declarations.push(build_accessor(&field, kind)),
            }
        }
        if declarations.is_empty() {
            let (name, loc) = existing.unwrap_or_else(|| (field.spelling(), field.location()));
            return Err(StubError::AlreadyDefined {
                name,
                file: loc.as_ref().map_or_else(|| input.clone(), |loc| loc.file.clone()),
                line: loc.map_or(line, |loc| loc.line),
            });
        }

        let file = field.file().unwrap_or(input);
        let (start_line, end_line) = field.extent().map_or((line, line), |extent| (extent.start.line, extent.end.line));
        editor.switch_or_open_buffer(&file)?;
        let indent: String = line_text(&*editor, &file, start_line)
            .map(|text| text.chars().take_while(|ch| ch.is_whitespace()).collect())
            .unwrap_or_default();

        let lines: Vec<String> = declarations.iter().map(|decl| format!("{indent}{decl};")).collect();
        editor.insert_lines(&file, end_line as usize, &lines)?;
        let first = end_line + 1;
        editor.move_cursor(first);
        info!("[accessor] inserted {} declaration(s) into {}:{first}", lines.len(), file.display());

        Ok(Insertion {
            file,
            line: first,
            cursor_line: first,
            lines,
        })
    }

    fn definition_files(
        &self,
        editor: &impl Editor,
        input: &Path,
        force_inline: bool,
    ) -> Result<FileSet, StubError> {
        if self.settings.is_source(input) {
            return Err(StubError::AmbiguousFileRole(input.to_path_buf()));
        }
        FileSet::resolve(editor, input, force_inline, &self.settings)
    }

    /// Parse the output with every open companion buffer overlaid.
    fn parse(
        &self,
        editor: &impl Editor,
        files: &FileSet,
    ) -> Result<P::Unit, StubError> {
        let mut paths: Vec<PathBuf> = files.companions().map(Path::to_path_buf).collect();
        paths.push(files.input.clone());
        self.parser.parse(&files.output, &collect_overlays(editor, &paths))
    }

    fn write_stub(
        &self,
        editor: &mut impl Editor,
        files: &FileSet,
        stub: &Stub,
    ) -> Result<Insertion, StubError> {
        editor.switch_or_open_buffer(&files.output)?;
        let existing = editor.buffer_lines(&files.output).unwrap_or_default();
        let index = match stub.point {
            InsertionPoint::Above(line) => (line.saturating_sub(1) as usize).min(existing.len()),
            InsertionPoint::EndOfFile => {
                let above_guard = files.is_output_header() && self.settings.above_include_guard;
                end_of_file_index(&existing, above_guard)
            },
        };

        let lines = stub.lines();
        editor.insert_lines(&files.output, index, &lines)?;
        // The blank body line is the third from the end.
        let cursor_line = (index + lines.len()).saturating_sub(2) as u32;
        editor.move_cursor(cursor_line);
        info!("[generate] inserted {} lines into {}:{}", lines.len(), files.output.display(), index + 1);

        Ok(Insertion {
            file: files.output.clone(),
            line: index as u32 + 1,
            cursor_line,
            lines,
        })
    }
}

/// 0-based insertion index for an end-of-file stub.
fn end_of_file_index(
    lines: &[String],
    above_include_guard: bool,
) -> usize {
    if above_include_guard
        && let Some(guard) = (2..lines.len()).rev().find(|&i| INCLUDE_GUARD_END.is_match(&lines[i]))
    {
        return guard;
    }
    lines.len()
}

/// Unsaved contents of every open buffer among `paths`.
fn collect_overlays(
    editor: &impl Editor,
    paths: &[PathBuf],
) -> Vec<Overlay> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|path| seen.insert((*path).clone()))
        .filter_map(|path| {
            let lines = editor.buffer_lines(path)?;
            let mut contents = lines.join("\n");
            contents.push('\n');
            Some(Overlay::new(path, contents))
        })
        .collect()
}

/// One 1-based line of `path`, from its buffer when open, else from disk.
fn line_text(
    editor: &impl Editor,
    path: &Path,
    line: u32,
) -> Option<String> {
    let index = (line as usize).checked_sub(1)?;
    match editor.buffer_lines(path) {
        Some(lines) => lines.get(index).cloned(),
        None => std::fs::read_to_string(path).ok()?.lines().nth(index).map(str::to_owned),
    }
}

#[cfg(test)]
#[path = "../../tests/src/stub/generate_tests.rs"]
mod tests;
