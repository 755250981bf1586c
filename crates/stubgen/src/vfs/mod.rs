use std::path::{Path, PathBuf};

/// Canonical form of `path` used as the key for buffers and AST locations.
///
/// Paths that do not exist yet are kept as given.
pub fn normalized_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
