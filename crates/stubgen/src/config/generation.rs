use std::{collections::HashMap, path::Path};

use serde::Deserialize;
use serde_json::Value;

const DEFAULT_HEADER_EXTENSIONS: [&str; 3] = [".hpp", ".hxx", ".h"];
const DEFAULT_SOURCE_EXTENSIONS: [&str; 3] = [".cpp", ".cxx", ".c"];

/// File pairing and accessor options.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Header extensions in lookup priority order, each with a leading dot.
    pub header_extensions: Vec<String>,
    /// Source extensions in lookup priority order, each with a leading dot.
    pub source_extensions: Vec<String>,
    pub getter: bool,
    pub setter: bool,
    /// Place end-of-file header stubs above a trailing `#endif`.
    pub above_include_guard: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            header_extensions: DEFAULT_HEADER_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            getter: true,
            setter: true,
            above_include_guard: true,
        }
    }
}

impl GenerationSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: GenerationSettingsPatch,
    ) {
        if let Some(v) = patch.header_extensions {
            self.header_extensions = v;
        }
        if let Some(v) = patch.source_extensions {
            self.source_extensions = v;
        }
        if let Some(v) = patch.getter {
            self.getter = v;
        }
        if let Some(v) = patch.setter {
            self.setter = v;
        }
        if let Some(v) = patch.above_include_guard {
            self.above_include_guard = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.header_extensions = normalize_extensions(&self.header_extensions, &DEFAULT_HEADER_EXTENSIONS);
        self.source_extensions = normalize_extensions(&self.source_extensions, &DEFAULT_SOURCE_EXTENSIONS);
    }

    pub fn is_header(
        &self,
        path: &Path,
    ) -> bool {
        has_extension(path, &self.header_extensions)
    }

    pub fn is_source(
        &self,
        path: &Path,
    ) -> bool {
        has_extension(path, &self.source_extensions)
    }
}

fn normalize_extensions(
    extensions: &[String],
    defaults: &[&str],
) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() {
            continue;
        }
        let ext = format!(".{ext}");
        if !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }
    if normalized.is_empty() {
        return defaults.iter().map(|ext| ext.to_string()).collect();
    }
    normalized
}

fn has_extension(
    path: &Path,
    extensions: &[String],
) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions.iter().any(|candidate| candidate.trim_start_matches('.') == ext)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct GenerationSettingsPatch {
    pub(crate) header_extensions: Option<Vec<String>>,
    pub(crate) source_extensions: Option<Vec<String>>,
    pub(crate) getter: Option<bool>,
    pub(crate) setter: Option<bool>,
    pub(crate) above_include_guard: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
