//! AST backend built on `clang++ -Xclang -ast-dump=json`.

mod compiler;
mod nodes;
mod tree;

pub use compiler::ClangParser;
pub use tree::{ClangCursor, ClangUnit};
