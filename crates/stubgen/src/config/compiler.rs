use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

const DEFAULT_CLANG_PATH: &str = "clang++";
const DEFAULT_STANDARD: &str = "c++11";

/// How the AST dump is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerSettings {
    pub clang_path: String,
    /// Value for `-std=`.
    pub standard: String,
    pub include_paths: Vec<String>,
    pub extra_flags: Vec<String>,
    /// Bodies never matter for stubs, so they are skipped by default.
    pub skip_function_bodies: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            clang_path: DEFAULT_CLANG_PATH.to_string(),
            standard: DEFAULT_STANDARD.to_string(),
            include_paths: Vec::new(),
            extra_flags: Vec::new(),
            skip_function_bodies: true,
        }
    }
}

impl CompilerSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: CompilerSettingsPatch,
    ) {
        if let Some(v) = patch.clang_path {
            self.clang_path = v;
        }
        if let Some(v) = patch.standard {
            self.standard = v;
        }
        if let Some(v) = patch.include_paths {
            self.include_paths = v;
        }
        if let Some(v) = patch.extra_flags {
            self.extra_flags = v;
        }
        if let Some(v) = patch.skip_function_bodies {
            self.skip_function_bodies = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.clang_path = self.clang_path.trim().to_string();
        if self.clang_path.is_empty() {
            self.clang_path = DEFAULT_CLANG_PATH.to_string();
        }
        let standard = self.standard.trim();
        let standard = standard.strip_prefix("-std=").unwrap_or(standard);
        self.standard = if standard.is_empty() { DEFAULT_STANDARD.to_string() } else { standard.to_string() };

        self.include_paths =
            self.include_paths.iter().map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect();
        self.extra_flags = self.extra_flags.iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CompilerSettingsPatch {
    pub(crate) clang_path: Option<String>,
    pub(crate) standard: Option<String>,
    pub(crate) include_paths: Option<Vec<String>>,
    pub(crate) extra_flags: Option<Vec<String>>,
    pub(crate) skip_function_bodies: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
