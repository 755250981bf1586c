//! Definition stub synthesis.
//!
//! Resolves the declaration under the cursor, looks for an existing
//! definition, works out where the new one goes and how much namespace
//! qualification it needs, and writes it through an [`crate::editor::Editor`].

mod accessor;
mod error;
mod fileset;
mod generate;
mod lookup;
mod resolve;
mod scope;
mod signature;

pub use accessor::{AccessorKind, accessor_name, build_accessor, method_name_from_field};
pub use error::StubError;
pub use fileset::FileSet;
pub use generate::{Generator, Insertion, LineFailure, RangeReport, Stub, generate_method_stub};
pub use lookup::DefinitionIndex;
pub use resolve::{find_field_name_column, find_function_name_column, resolve_field, resolve_function};
pub use scope::{
    InsertionPoint, Placement, following_declarations, lexical_namespaces, namespace_chain,
    namespace_qualification, resolve_placement,
};
pub use signature::{build_declaration, display_name, format_type_name, strip_template_args};
