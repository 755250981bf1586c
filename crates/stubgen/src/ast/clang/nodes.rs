use clang_ast::{BareSourceLocation, Id, SourceLocation, SourceRange};
use serde::Deserialize;

pub type Node = clang_ast::Node<Clang>;

/// Typed representation of the Clang AST node kinds the stub engine reads.
///
/// Each variant corresponds to a Clang AST node `"kind"` value. Everything
/// else lands in `Other` but is still kept in the tree so lexical nesting
/// (e.g. `extern "C" { ... }`) is preserved.
#[derive(Deserialize)]
pub enum Clang {
    TranslationUnitDecl(DeclData),
    NamespaceDecl(DeclData),
    CXXRecordDecl(DeclData),
    ClassTemplateDecl(DeclData),
    FunctionDecl(DeclData),
    FunctionTemplateDecl(DeclData),
    CXXMethodDecl(DeclData),
    CXXConstructorDecl(DeclData),
    CXXDestructorDecl(DeclData),
    CXXConversionDecl(DeclData),
    FieldDecl(DeclData),
    ParmVarDecl(DeclData),
    TemplateTypeParmDecl(DeclData),
    NonTypeTemplateParmDecl(DeclData),
    ClassTemplateSpecializationDecl(DeclData),

    // The `loc` and `range` fields MUST be deserialized even for unrecognized
    // node kinds. `clang-ast` tracks the "current file" across the stream via
    // `SourceLocation`; skipping them makes later nodes inherit a wrong file.
    Other {
        #[serde(default)]
        loc: Option<SourceLocation>,
        #[serde(default)]
        range: Option<SourceRange>,
        #[serde(rename = "isImplicit", default)]
        is_implicit: Option<bool>,
    },
}

/// Common data for all declaration nodes.
#[derive(Deserialize, Debug, Default)]
pub struct DeclData {
    pub name: Option<String>,
    pub loc: Option<SourceLocation>,
    pub range: Option<SourceRange>,
    #[serde(rename = "isImplicit")]
    pub is_implicit: Option<bool>,
    #[serde(rename = "type")]
    pub ty: Option<QualType>,
    #[serde(rename = "previousDecl")]
    pub previous_decl: Option<Id>,
    #[serde(rename = "parentDeclContextId")]
    pub parent_decl_context_id: Option<Id>,
    #[serde(rename = "originalNamespace")]
    pub original_namespace: Option<DeclRef>,
    #[serde(rename = "tagUsed")]
    pub tag_used: Option<String>,
}

/// Inline reference to another declaration.
#[derive(Deserialize, Debug)]
pub struct DeclRef {
    pub id: Id,
}

/// Clang's qualified type representation.
#[derive(Deserialize, Debug)]
pub struct QualType {
    #[serde(rename = "qualType")]
    pub qual_type: Option<String>,
}

impl DeclData {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn is_implicit(&self) -> bool {
        self.is_implicit.unwrap_or(false)
    }

    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().and_then(|t| t.qual_type.as_deref())
    }

    /// Id of the declaration this one redeclares, if any.
    pub fn redeclares(&self) -> Option<Id> {
        self.original_namespace.as_ref().map(|ns| ns.id).or(self.previous_decl)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.tag_used.as_deref(), Some("struct" | "union"))
    }
}

/// Extract the best concrete source location from a [`SourceLocation`].
///
/// Prefers the expansion location (where a macro was invoked, the position
/// the user sees in their file) over the spelling location.
pub fn resolve_loc(loc: &SourceLocation) -> Option<&BareSourceLocation> {
    loc.expansion_loc.as_ref().or(loc.spelling_loc.as_ref())
}
