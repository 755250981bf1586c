use std::path::PathBuf;

use thiserror::Error;

/// Why a generation request produced no text.
///
/// Every error is local to one invocation and leaves the buffers untouched.
#[derive(Debug, Error)]
pub enum StubError {
    /// Neither the AST nor the line heuristics found a declaration.
    #[error("unable to find a declaration at {}:{line}", file.display())]
    NoDeclarationFound { file: PathBuf, line: u32 },

    /// The declaration already has an out-of-line definition.
    #[error("'{name}' is already defined at {}:{line}", file.display())]
    AlreadyDefined { name: String, file: PathBuf, line: u32 },

    /// Definitions are generated from headers, not from source files.
    #[error("{} is a source file; generate definitions from its header", .0.display())]
    AmbiguousFileRole(PathBuf),

    /// No header or source file pairs with the edited file.
    #[error("no header or source file pairs with {}", .0.display())]
    MissingCompanion(PathBuf),

    /// The AST toolchain could not be run or produced nothing usable.
    #[error("{command}: {reason}")]
    Toolchain { command: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
