//! Narrow query interface over a parsed C++ translation unit.
//!
//! The synthesis engine only ever talks to the AST through the traits in
//! this module, so every traversal in [`crate::stub`] runs equally well
//! against the clang backend in [`clang`] and against hand-built trees in
//! tests.

pub mod clang;
pub mod tokens;
mod walk;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::stub::StubError;

pub use walk::{Visit, walk};

/// Declaration kinds the engine distinguishes. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    TranslationUnit,
    Namespace,
    ClassDecl,
    StructDecl,
    ClassTemplate,
    FunctionDecl,
    FunctionTemplate,
    CxxMethod,
    Constructor,
    Destructor,
    ConversionFunction,
    FieldDecl,
    ParmDecl,
    TemplateTypeParameter,
    NonTypeTemplateParameter,
    Other,
}

impl CursorKind {
    /// Anything that can receive an out-of-line definition.
    pub fn is_function(self) -> bool {
        matches!(
            self,
            Self::FunctionDecl
                | Self::FunctionTemplate
                | Self::CxxMethod
                | Self::Constructor
                | Self::Destructor
                | Self::ConversionFunction
        )
    }

    pub fn is_record(self) -> bool {
        matches!(self, Self::ClassDecl | Self::StructDecl | Self::ClassTemplate)
    }

    pub fn is_template_parameter(self) -> bool {
        matches!(self, Self::TemplateTypeParameter | Self::NonTypeTemplateParameter)
    }
}

/// Opaque per-parse node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A 1-based position in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePos {
    pub file: PathBuf,
    pub line: u32,
    pub col: u32,
}

impl SourcePos {
    pub fn new(
        file: impl Into<PathBuf>,
        line: u32,
        col: u32,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.col)
    }
}

/// Inclusive source range. `end` points at the first character of the last token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceExtent {
    pub start: SourcePos,
    pub end: SourcePos,
}

impl SourceExtent {
    pub fn new(
        start: SourcePos,
        end: SourcePos,
    ) -> Self {
        Self {
            start,
            end,
        }
    }

    /// Whether the 1-based `(line, col)` falls inside the range.
    ///
    /// `end_tok_len` widens the end so the last token is covered entirely.
    pub fn contains(
        &self,
        line: u32,
        col: u32,
        end_tok_len: u32,
    ) -> bool {
        let pos = (line, col);
        let start = (self.start.line, self.start.col);
        let end = (self.end.line, self.end.col + end_tok_len.saturating_sub(1));
        start <= pos && pos <= end
    }
}

/// In-memory contents of an unsaved buffer handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub path: PathBuf,
    pub contents: String,
}

impl Overlay {
    pub fn new(
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// One node of a parsed translation unit.
///
/// Cursors are cheap handles into a tree owned by the parse; cloning never
/// copies the tree.
pub trait Cursor: Clone + fmt::Debug {
    fn id(&self) -> NodeId;
    fn kind(&self) -> CursorKind;
    /// Bare name of the declaration (`""` for anonymous entities).
    fn spelling(&self) -> String;
    /// Position of the declaration's name.
    fn location(&self) -> Option<SourcePos>;
    fn extent(&self) -> Option<SourceExtent>;
    /// Declared type, e.g. `int *` for a field or `void (int) const` for a method.
    fn type_spelling(&self) -> Option<String>;
    /// Return type of a function-like cursor.
    fn result_type_spelling(&self) -> Option<String>;
    fn children(&self) -> Vec<Self>;
    fn semantic_parent(&self) -> Option<Self>;
    fn lexical_parent(&self) -> Option<Self>;
    /// First declaration of the same entity.
    fn canonical(&self) -> Self;
    /// Raw tokens covering the extent, whitespace and comments excluded.
    fn tokens(&self) -> Vec<String>;

    fn is_same_entity(
        &self,
        other: &Self,
    ) -> bool {
        self.canonical().id() == other.canonical().id()
    }

    fn file(&self) -> Option<PathBuf> {
        self.location().map(|loc| loc.file)
    }

    fn is_in_file(
        &self,
        file: &Path,
    ) -> bool {
        self.location().is_some_and(|loc| loc.file == file)
    }
}

/// A parsed translation unit.
pub trait TranslationUnit {
    type Cursor: Cursor;

    fn root(&self) -> Self::Cursor;

    /// Deepest cursor whose extent covers the 1-based `line`/`col` in `file`.
    fn cursor_at(
        &self,
        file: &Path,
        line: u32,
        col: u32,
    ) -> Option<Self::Cursor>;
}

/// Produces translation units, honoring unsaved buffer overlays.
pub trait AstParser {
    type Unit: TranslationUnit;

    fn parse(
        &self,
        file: &Path,
        overlays: &[Overlay],
    ) -> Result<Self::Unit, StubError>;
}
