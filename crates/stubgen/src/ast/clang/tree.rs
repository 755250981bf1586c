use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use clang_ast::{BareSourceLocation, Id, SourceLocation, SourceRange};
use dashmap::DashMap;
use tracing::debug;

use super::nodes::{Clang, DeclData, Node, resolve_loc};
use crate::{
    ast::{Cursor, CursorKind, NodeId, SourceExtent, SourcePos, TranslationUnit, tokens},
    vfs::normalized_path,
};

/// A translation unit built from Clang's JSON AST dump.
pub struct ClangUnit {
    tree: Arc<AstTree>,
}

/// Handle to one node of a [`ClangUnit`].
#[derive(Clone)]
pub struct ClangCursor {
    tree: Arc<AstTree>,
    index: usize,
}

struct AstTree {
    nodes: Vec<TreeNode>,
    /// Texts clang actually saw for overlaid files.
    overlays: HashMap<PathBuf, Arc<str>>,
    /// Lazily loaded on-disk texts, used for token extraction.
    sources: DashMap<PathBuf, Option<Arc<str>>>,
}

struct TreeNode {
    kind: CursorKind,
    name: String,
    ty: Option<String>,
    loc: Option<SourcePos>,
    extent: Option<SourceExtent>,
    end_tok_len: u32,
    byte_range: Option<(usize, usize)>,
    children: Vec<usize>,
    lexical_parent: Option<usize>,
    semantic_parent: Option<usize>,
    canonical: usize,
}

impl ClangUnit {
    /// Build a unit from the raw JSON emitted by `-Xclang -ast-dump=json`.
    ///
    /// `path_map` rewrites file paths as reported by clang (temp overlay
    /// copies) to the paths the editor knows. `overlays` holds the texts of
    /// those files so tokens are read from what clang parsed.
    pub fn from_json(
        json: &str,
        path_map: &HashMap<String, PathBuf>,
        overlays: HashMap<PathBuf, Arc<str>>,
    ) -> Result<Self, serde_json::Error> {
        let root: Node = serde_json::from_str(json)?;
        Ok(Self::from_root(&root, path_map, overlays))
    }

    pub(crate) fn from_root(
        root: &Node,
        path_map: &HashMap<String, PathBuf>,
        overlays: HashMap<PathBuf, Arc<str>>,
    ) -> Self {
        let mut builder = Builder::new(path_map);
        builder.add(root, None);
        let nodes = builder.finish();
        debug!("[clang-tree] built {} cursors", nodes.len());

        Self {
            tree: Arc::new(AstTree {
                nodes,
                overlays,
                sources: DashMap::new(),
            }),
        }
    }

    fn cursor(
        &self,
        index: usize,
    ) -> ClangCursor {
        ClangCursor {
            tree: Arc::clone(&self.tree),
            index,
        }
    }
}

impl TranslationUnit for ClangUnit {
    type Cursor = ClangCursor;

    fn root(&self) -> ClangCursor {
        self.cursor(0)
    }

    fn cursor_at(
        &self,
        file: &Path,
        line: u32,
        col: u32,
    ) -> Option<ClangCursor> {
        let file = normalized_path(file);
        // Nodes are stored in pre-order, so among the (nested) nodes covering
        // the position the last one is the innermost.
        self.tree
            .nodes
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, node)| {
                node.extent
                    .as_ref()
                    .is_some_and(|ext| ext.start.file == file && ext.contains(line, col, node.end_tok_len))
            })
            .map(|(index, _)| index)
            .last()
            .map(|index| self.cursor(index))
    }
}

impl ClangCursor {
    fn node(&self) -> &TreeNode {
        &self.tree.nodes[self.index]
    }

    fn at(
        &self,
        index: usize,
    ) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            index,
        }
    }
}

impl fmt::Debug for ClangCursor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let node = self.node();
        f.debug_struct("ClangCursor")
            .field("index", &self.index)
            .field("kind", &node.kind)
            .field("name", &node.name)
            .field("loc", &node.loc)
            .finish()
    }
}

impl Cursor for ClangCursor {
    fn id(&self) -> NodeId {
        NodeId(self.index as u64)
    }

    fn kind(&self) -> CursorKind {
        self.node().kind
    }

    fn spelling(&self) -> String {
        self.node().name.clone()
    }

    fn location(&self) -> Option<SourcePos> {
        self.node().loc.clone()
    }

    fn extent(&self) -> Option<SourceExtent> {
        self.node().extent.clone()
    }

    fn type_spelling(&self) -> Option<String> {
        self.node().ty.clone()
    }

    fn result_type_spelling(&self) -> Option<String> {
        let node = self.node();
        if !node.kind.is_function() {
            return None;
        }
        node.ty.as_deref().and_then(result_type_of)
    }

    fn children(&self) -> Vec<Self> {
        self.node().children.iter().map(|&child| self.at(child)).collect()
    }

    fn semantic_parent(&self) -> Option<Self> {
        self.node().semantic_parent.map(|parent| self.at(parent))
    }

    fn lexical_parent(&self) -> Option<Self> {
        self.node().lexical_parent.map(|parent| self.at(parent))
    }

    fn canonical(&self) -> Self {
        self.at(self.node().canonical)
    }

    fn tokens(&self) -> Vec<String> {
        let node = self.node();
        let (Some(extent), Some((start, end))) = (&node.extent, node.byte_range) else {
            return Vec::new();
        };
        let Some(text) = self.tree.source_text(&extent.start.file) else {
            return Vec::new();
        };
        match text.get(start..end.min(text.len())) {
            Some(slice) => tokens::lex(slice),
            None => Vec::new(),
        }
    }
}

impl AstTree {
    fn source_text(
        &self,
        file: &Path,
    ) -> Option<Arc<str>> {
        if let Some(text) = self.overlays.get(file) {
            return Some(Arc::clone(text));
        }
        self.sources
            .entry(file.to_path_buf())
            .or_insert_with(|| std::fs::read_to_string(file).ok().map(Arc::from))
            .value()
            .clone()
    }
}

/// Recover the return type from a function `qualType`.
///
/// `"int *(const char *, int) const"` yields `"int *"`; a trailing return
/// type (`"auto (int) -> long"`) yields the trailing type.
pub(crate) fn result_type_of(qual_type: &str) -> Option<String> {
    let mut angle = 0usize;
    let mut open = None;
    for (i, ch) in qual_type.char_indices() {
        match ch {
            '<' => angle += 1,
            '>' => angle = angle.saturating_sub(1),
            '(' if angle == 0 => {
                open = Some(i);
                break;
            },
            _ => {},
        }
    }
    let open = open?;

    let mut depth = 0usize;
    let mut close = None;
    for (i, ch) in qual_type[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            },
            _ => {},
        }
    }

    if let Some(close) = close
        && let Some(arrow) = qual_type[close + 1..].find("->")
    {
        let trailing = qual_type[close + 1 + arrow + 2..].trim();
        if !trailing.is_empty() {
            return Some(trailing.to_owned());
        }
    }

    let result = qual_type[..open].trim();
    if result.is_empty() { None } else { Some(result.to_owned()) }
}

struct Pending {
    semantic: Option<Id>,
    redeclares: Option<Id>,
}

/// Everything `push` needs to know about a node before it is placed.
struct NodeSeed<'n> {
    kind: CursorKind,
    name: &'n str,
    ty: Option<&'n str>,
    loc: Option<&'n SourceLocation>,
    range: Option<&'n SourceRange>,
    semantic: Option<Id>,
    redeclares: Option<Id>,
}

impl<'n> NodeSeed<'n> {
    fn from_decl(
        kind: CursorKind,
        data: &'n DeclData,
    ) -> Self {
        Self {
            kind,
            name: data.name(),
            ty: data.qual_type(),
            loc: data.loc.as_ref(),
            range: data.range.as_ref(),
            semantic: data.parent_decl_context_id,
            redeclares: data.redeclares(),
        }
    }
}

struct Builder<'a> {
    nodes: Vec<TreeNode>,
    pending: Vec<Pending>,
    ids: HashMap<Id, usize>,
    path_map: &'a HashMap<String, PathBuf>,
    path_cache: HashMap<String, PathBuf>,
}

impl<'a> Builder<'a> {
    fn new(path_map: &'a HashMap<String, PathBuf>) -> Self {
        Self {
            nodes: Vec::new(),
            pending: Vec::new(),
            ids: HashMap::new(),
            path_map,
            path_cache: HashMap::new(),
        }
    }

    fn add(
        &mut self,
        node: &Node,
        parent: Option<usize>,
    ) {
        match &node.kind {
            Clang::TranslationUnitDecl(d) => self.add_decl(node, d, CursorKind::TranslationUnit, parent),
            Clang::NamespaceDecl(d) => self.add_decl(node, d, CursorKind::Namespace, parent),
            Clang::CXXRecordDecl(d) => {
                let kind = if d.is_struct() { CursorKind::StructDecl } else { CursorKind::ClassDecl };
                self.add_decl(node, d, kind, parent);
            },
            Clang::ClassTemplateDecl(d) => {
                self.add_template(node, d, CursorKind::ClassTemplate, parent, |kind| {
                    matches!(kind, Clang::CXXRecordDecl(_))
                });
            },
            Clang::FunctionTemplateDecl(d) => {
                self.add_template(node, d, CursorKind::FunctionTemplate, parent, |kind| {
                    function_kind(kind).is_some()
                });
            },
            Clang::FunctionDecl(d) => self.add_decl(node, d, CursorKind::FunctionDecl, parent),
            Clang::CXXMethodDecl(d) => self.add_decl(node, d, CursorKind::CxxMethod, parent),
            Clang::CXXConstructorDecl(d) => self.add_decl(node, d, CursorKind::Constructor, parent),
            Clang::CXXDestructorDecl(d) => self.add_decl(node, d, CursorKind::Destructor, parent),
            Clang::CXXConversionDecl(d) => self.add_decl(node, d, CursorKind::ConversionFunction, parent),
            Clang::FieldDecl(d) => self.add_decl(node, d, CursorKind::FieldDecl, parent),
            Clang::ParmVarDecl(d) => self.add_decl(node, d, CursorKind::ParmDecl, parent),
            Clang::TemplateTypeParmDecl(d) => self.add_decl(node, d, CursorKind::TemplateTypeParameter, parent),
            Clang::NonTypeTemplateParmDecl(d) => {
                self.add_decl(node, d, CursorKind::NonTypeTemplateParameter, parent);
            },
            Clang::ClassTemplateSpecializationDecl(_) => {},
            Clang::Other {
                loc,
                range,
                is_implicit,
            } => {
                if is_implicit.unwrap_or(false) {
                    return;
                }
                let index = self.push(
                    node.id,
                    NodeSeed {
                        kind: CursorKind::Other,
                        name: "",
                        ty: None,
                        loc: loc.as_ref(),
                        range: range.as_ref(),
                        semantic: None,
                        redeclares: None,
                    },
                    parent,
                );
                self.add_children(&node.inner, index);
            },
        }
    }

    fn add_decl(
        &mut self,
        node: &Node,
        data: &DeclData,
        kind: CursorKind,
        parent: Option<usize>,
    ) {
        if data.is_implicit() {
            return;
        }
        let index = self.push(node.id, NodeSeed::from_decl(kind, data), parent);
        self.add_children(&node.inner, index);
    }

    /// Fold a `*TemplateDecl` and its templated declaration into one cursor.
    ///
    /// The cursor carries the template's name and extent, the templated
    /// declaration's name location and type, and the template parameters
    /// followed by the templated declaration's own children.
    fn add_template(
        &mut self,
        node: &Node,
        data: &DeclData,
        kind: CursorKind,
        parent: Option<usize>,
        is_templated: impl Fn(&Clang) -> bool,
    ) {
        if data.is_implicit() {
            return;
        }
        let templated = node.inner.iter().find(|child| is_templated(&child.kind));
        let inner = templated.and_then(|child| decl_data(&child.kind));

        let mut seed = NodeSeed::from_decl(kind, data);
        if let Some(inner) = inner {
            seed.ty = inner.qual_type();
            seed.loc = inner.loc.as_ref().or(seed.loc);
            seed.semantic = seed.semantic.or(inner.parent_decl_context_id);
            seed.redeclares = seed.redeclares.or(inner.previous_decl);
        }
        let index = self.push(node.id, seed, parent);

        for child in &node.inner {
            if matches!(child.kind, Clang::TemplateTypeParmDecl(_) | Clang::NonTypeTemplateParmDecl(_)) {
                self.add(child, Some(index));
            }
        }
        if let Some(templated) = templated {
            self.ids.insert(templated.id, index);
            self.add_children(&templated.inner, index);
        }
    }

    fn add_children(
        &mut self,
        children: &[Node],
        parent: usize,
    ) {
        for child in children {
            self.add(child, Some(parent));
        }
    }

    fn push(
        &mut self,
        id: Id,
        seed: NodeSeed<'_>,
        parent: Option<usize>,
    ) -> usize {
        let index = self.nodes.len();
        let loc = seed.loc.and_then(resolve_loc).and_then(|bare| self.pos(bare));
        let (extent, end_tok_len, byte_range) = match seed.range {
            Some(range) => self.extent(range),
            None => (None, 0, None),
        };

        self.nodes.push(TreeNode {
            kind: seed.kind,
            name: seed.name.to_owned(),
            ty: seed.ty.map(str::to_owned),
            loc,
            extent,
            end_tok_len,
            byte_range,
            children: Vec::new(),
            lexical_parent: parent,
            semantic_parent: None,
            canonical: index,
        });
        self.pending.push(Pending {
            semantic: seed.semantic,
            redeclares: seed.redeclares,
        });
        self.ids.insert(id, index);
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    fn pos(
        &mut self,
        bare: &BareSourceLocation,
    ) -> Option<SourcePos> {
        if bare.line == 0 || bare.file.is_empty() {
            return None;
        }
        let file = self.remap(&bare.file);
        Some(SourcePos::new(file, bare.line as u32, bare.col as u32))
    }

    fn extent(
        &mut self,
        range: &SourceRange,
    ) -> (Option<SourceExtent>, u32, Option<(usize, usize)>) {
        let (Some(begin), Some(end)) = (resolve_loc(&range.begin), resolve_loc(&range.end)) else {
            return (None, 0, None);
        };
        let (Some(start_pos), Some(end_pos)) = (self.pos(begin), self.pos(end)) else {
            return (None, 0, None);
        };
        let byte_range = (begin.file == end.file && end.offset >= begin.offset)
            .then(|| (begin.offset, end.offset + end.tok_len));
        (Some(SourceExtent::new(start_pos, end_pos)), end.tok_len as u32, byte_range)
    }

    fn remap(
        &mut self,
        file: &str,
    ) -> PathBuf {
        if let Some(mapped) = self.path_map.get(file) {
            return mapped.clone();
        }
        self.path_cache.entry(file.to_owned()).or_insert_with(|| normalized_path(Path::new(file))).clone()
    }

    fn finish(mut self) -> Vec<TreeNode> {
        for index in 0..self.nodes.len() {
            let semantic = self.pending[index]
                .semantic
                .and_then(|id| self.ids.get(&id).copied())
                .or(self.nodes[index].lexical_parent);
            self.nodes[index].semantic_parent = semantic;
        }

        for index in 0..self.nodes.len() {
            let mut current = index;
            let mut hops = 0;
            while let Some(previous) = self.pending[current].redeclares.and_then(|id| self.ids.get(&id).copied()) {
                if previous == current || hops > self.nodes.len() {
                    break;
                }
                current = previous;
                hops += 1;
            }
            self.nodes[index].canonical = current;
        }

        self.nodes
    }
}

fn function_kind(kind: &Clang) -> Option<CursorKind> {
    match kind {
        Clang::FunctionDecl(_) => Some(CursorKind::FunctionDecl),
        Clang::CXXMethodDecl(_) => Some(CursorKind::CxxMethod),
        Clang::CXXConstructorDecl(_) => Some(CursorKind::Constructor),
        Clang::CXXDestructorDecl(_) => Some(CursorKind::Destructor),
        Clang::CXXConversionDecl(_) => Some(CursorKind::ConversionFunction),
        _ => None,
    }
}

fn decl_data(kind: &Clang) -> Option<&DeclData> {
    match kind {
        Clang::TranslationUnitDecl(d)
        | Clang::NamespaceDecl(d)
        | Clang::CXXRecordDecl(d)
        | Clang::ClassTemplateDecl(d)
        | Clang::FunctionDecl(d)
        | Clang::FunctionTemplateDecl(d)
        | Clang::CXXMethodDecl(d)
        | Clang::CXXConstructorDecl(d)
        | Clang::CXXDestructorDecl(d)
        | Clang::CXXConversionDecl(d)
        | Clang::FieldDecl(d)
        | Clang::ParmVarDecl(d)
        | Clang::TemplateTypeParmDecl(d)
        | Clang::NonTypeTemplateParmDecl(d)
        | Clang::ClassTemplateSpecializationDecl(d) => Some(d),
        Clang::Other {
            ..
        } => None,
    }
}

#[cfg(test)]
#[path = "../../../tests/src/ast/clang/tree_tests.rs"]
mod tests;
