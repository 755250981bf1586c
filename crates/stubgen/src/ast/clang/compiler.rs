use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::Command,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::{debug, warn};

use super::tree::ClangUnit;
use crate::{
    ast::{AstParser, Overlay},
    config::CompilerSettings,
    stub::StubError,
    vfs::normalized_path,
};

static NEXT_AST_DUMP_ID: AtomicU64 = AtomicU64::new(1);

/// Parses translation units by running clang's JSON AST dump.
#[derive(Debug, Clone, Default)]
pub struct ClangParser {
    settings: CompilerSettings,
}

impl ClangParser {
    pub fn new(settings: CompilerSettings) -> Self {
        Self {
            settings,
        }
    }
}

impl AstParser for ClangParser {
    type Unit = ClangUnit;

    fn parse(
        &self,
        file: &Path,
        overlays: &[Overlay],
    ) -> Result<ClangUnit, StubError> {
        let overlays = with_parsed_file(file, overlays);
        let dump = OverlayDir::create(&overlays)?;
        let target = dump.path_for(file).unwrap_or_else(|| file.to_path_buf());
        let args = ast_dump_args(&self.settings, file, &target);

        debug!("AST dump: {} {}", self.settings.clang_path, args.join(" "));

        let output = Command::new(&self.settings.clang_path).args(&args).output().map_err(|e| {
            StubError::Toolchain {
                command: self.settings.clang_path.clone(),
                reason: e.to_string(),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            for line in stderr.lines() {
                if line.contains("error:") {
                    warn!("[ast-dump] compiler error: {line}");
                }
            }
            debug!("[ast-dump] exited with non-zero status (partial AST may still be usable)");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.is_empty() || !stdout.starts_with('{') {
            return Err(StubError::Toolchain {
                command: self.settings.clang_path.clone(),
                reason: format!("no usable AST produced for {}", file.display()),
            });
        }
        debug!("[ast-dump] produced {} bytes of JSON for {}", stdout.len(), file.display());

        ClangUnit::from_json(&stdout, &dump.path_map, dump.texts()).map_err(|e| StubError::Toolchain {
            command: self.settings.clang_path.clone(),
            reason: format!("unreadable AST dump: {e}"),
        })
    }
}

/// Once anything is overlaid, the parsed file has to live next to the
/// overlays too, or its quoted includes would resolve to the on-disk copies.
fn with_parsed_file(
    file: &Path,
    overlays: &[Overlay],
) -> Vec<Overlay> {
    let mut overlays = overlays.to_vec();
    let target = normalized_path(file);
    if !overlays.is_empty()
        && !overlays.iter().any(|overlay| normalized_path(&overlay.path) == target)
        && let Ok(text) = std::fs::read_to_string(file)
    {
        overlays.push(Overlay::new(file, text));
    }
    overlays
}

/// Build the clang command line for dumping `target`, which stands in for
/// `original` when the latter has an unsaved overlay.
pub(crate) fn ast_dump_args(
    settings: &CompilerSettings,
    original: &Path,
    target: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-x".to_string(),
        "c++".to_string(),
        format!("-std={}", settings.standard),
        "-fsyntax-only".to_string(),
        "-fno-color-diagnostics".to_string(),
        "-Xclang".to_string(),
        "-ast-dump=json".to_string(),
    ];
    if settings.skip_function_bodies {
        args.push("-Xclang".to_string());
        args.push("-skip-function-bodies".to_string());
    }

    // The overlay copy lives in a temp dir, so the original directory must be
    // searched explicitly for headers that are not overlaid.
    let mut seen = std::collections::HashSet::new();
    let original_dir = original.parent().map(|dir| dir.display().to_string());
    for include in original_dir.iter().chain(settings.include_paths.iter()) {
        if seen.insert(include.clone()) {
            args.push(format!("-I{include}"));
        }
    }
    args.extend(settings.extra_flags.iter().cloned());
    args.push(target.display().to_string());
    args
}

/// Temporary directory holding unsaved buffers under their own file names.
///
/// Removed again when dropped.
struct OverlayDir {
    dir: PathBuf,
    /// Original path -> temp copy.
    copies: HashMap<PathBuf, PathBuf>,
    /// Temp path as clang reports it -> original path.
    path_map: HashMap<String, PathBuf>,
    contents: HashMap<PathBuf, Arc<str>>,
}

impl OverlayDir {
    fn create(overlays: &[Overlay]) -> Result<Self, StubError> {
        let id = NEXT_AST_DUMP_ID.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("stubgen-{}-{id}", std::process::id()));
        let mut this = Self {
            dir,
            copies: HashMap::new(),
            path_map: HashMap::new(),
            contents: HashMap::new(),
        };
        if overlays.is_empty() {
            return Ok(this);
        }

        std::fs::create_dir_all(&this.dir)?;
        for overlay in overlays {
            let Some(name) = overlay.path.file_name() else {
                continue;
            };
            let copy = this.dir.join(name);
            std::fs::write(&copy, &overlay.contents)?;

            let original = normalized_path(&overlay.path);
            this.path_map.insert(copy.display().to_string(), original.clone());
            if let Ok(canonical) = std::fs::canonicalize(&copy) {
                this.path_map.insert(canonical.display().to_string(), original.clone());
            }
            this.copies.insert(original.clone(), copy);
            this.contents.insert(original, Arc::from(overlay.contents.as_str()));
        }
        Ok(this)
    }

    fn path_for(
        &self,
        original: &Path,
    ) -> Option<PathBuf> {
        self.copies.get(&normalized_path(original)).cloned()
    }

    fn texts(&self) -> HashMap<PathBuf, Arc<str>> {
        self.contents.clone()
    }
}

impl Drop for OverlayDir {
    fn drop(&mut self) {
        for copy in self.copies.values() {
            let _ = std::fs::remove_file(copy);
        }
        let _ = std::fs::remove_dir(&self.dir);
    }
}

#[cfg(test)]
#[path = "../../../tests/src/ast/clang/compiler_tests.rs"]
mod tests;
