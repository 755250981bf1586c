//! Layered settings.
//!
//! Settings are split into one file per category. [`Settings`] aggregates
//! them and merges partial "patch" payloads over the defaults, in order:
//! `stubgen.toml`, then LSP initialization options and
//! `didChangeConfiguration` payloads.

pub(crate) mod compiler;
pub(crate) mod generation;
pub(crate) mod logging;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

pub use compiler::CompilerSettings;
use compiler::CompilerSettingsPatch;
pub use generation::GenerationSettings;
use generation::GenerationSettingsPatch;
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const SETTINGS_SECTION_KEY: &str = "stubgen";
pub const CONFIG_FILENAME: &str = "stubgen.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub compiler: CompilerSettings,
    pub generation: GenerationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Settings {
    pub fn from_lsp_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<SettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    /// Merge a `stubgen.toml` over `self`.
    ///
    /// The file uses the same camelCase keys as the LSP payload, either at
    /// the top level or under a `[stubgen]` table.
    pub fn merged_with_file(
        &self,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table: toml::Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let payload = serde_json::to_value(table).unwrap_or(Value::Null);
        Ok(self.merged_with_payload(&payload))
    }

    /// Defaults merged with the nearest `stubgen.toml` above `start`, if any.
    pub fn discover(start: &Path) -> Self {
        let defaults = Self::default();
        let Some(path) = find_config(start) else {
            return defaults;
        };
        match defaults.merged_with_file(&path) {
            Ok(settings) => {
                debug!("loaded settings from {}", path.display());
                settings
            },
            Err(err) => {
                warn!("ignoring {err}");
                defaults
            },
        }
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.compiler {
            self.compiler.apply_patch(p);
        }
        if let Some(p) = patch.generation {
            self.generation.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.compiler.normalize();
        self.generation.normalize();
    }
}

/// Walks parent directories from `start` looking for `stubgen.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() { start.parent()? } else { start };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct SettingsPatch {
    compiler: Option<CompilerSettingsPatch>,
    generation: Option<GenerationSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
