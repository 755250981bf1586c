use serde_json::json;

use super::*;

fn unique_temp_dir(name: &str) -> PathBuf {
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("valid clock")
        .as_nanos();
    std::env::temp_dir().join(format!("stubgen-settings-{name}-{}-{nonce}", std::process::id()))
}

#[test]
fn parses_namespaced_payload() {
    let payload = json!({
        "stubgen": {
            "compiler": {
                "clangPath": "/usr/bin/clang++-17",
                "standard": "c++17",
                "includePaths": ["/tmp/includes", "  "],
                "extraFlags": ["-DSTUB"],
                "skipFunctionBodies": false
            },
            "generation": {
                "headerExtensions": ["hh", ".h"],
                "sourceExtensions": ["cc"],
                "setter": false,
                "aboveIncludeGuard": false
            },
            "logging": {
                "level": "debug"
            }
        }
    });

    let settings = Settings::from_lsp_payload(Some(&payload));
    assert_eq!(settings.compiler.clang_path, "/usr/bin/clang++-17");
    assert_eq!(settings.compiler.standard, "c++17");
    assert_eq!(settings.compiler.include_paths, vec!["/tmp/includes"]);
    assert_eq!(settings.compiler.extra_flags, vec!["-DSTUB"]);
    assert!(!settings.compiler.skip_function_bodies);
    assert_eq!(settings.generation.header_extensions, vec![".hh", ".h"]);
    assert_eq!(settings.generation.source_extensions, vec![".cc"]);
    assert!(settings.generation.getter);
    assert!(!settings.generation.setter);
    assert!(!settings.generation.above_include_guard);
    assert_eq!(settings.logging.level, LogLevel::Debug);
}

#[test]
fn parses_direct_payload_and_ignores_unknown_keys() {
    let payload = json!({
        "generation": { "getter": false, "somethingNew": 1 },
        "formatting": { "enabled": true }
    });

    let settings = Settings::from_lsp_payload(Some(&payload));
    assert!(!settings.generation.getter);
    assert_eq!(settings.compiler, CompilerSettings::default());
}

#[test]
fn defaults_without_payload() {
    let settings = Settings::from_lsp_payload(None);
    assert_eq!(settings.compiler.clang_path, "clang++");
    assert_eq!(settings.compiler.standard, "c++11");
    assert!(settings.compiler.skip_function_bodies);
    assert_eq!(settings.generation.header_extensions, vec![".hpp", ".hxx", ".h"]);
    assert_eq!(settings.generation.source_extensions, vec![".cpp", ".cxx", ".c"]);
    assert_eq!(settings.logging.level, LogLevel::Info);
}

#[test]
fn normalize_restores_defaults_for_blank_values() {
    let payload = json!({
        "compiler": { "clangPath": "  ", "standard": "-std=c++14" },
        "generation": { "headerExtensions": [], "sourceExtensions": [" . "] }
    });

    let settings = Settings::from_lsp_payload(Some(&payload));
    assert_eq!(settings.compiler.clang_path, "clang++");
    assert_eq!(settings.compiler.standard, "c++14");
    assert_eq!(settings.generation.header_extensions, GenerationSettings::default().header_extensions);
    assert_eq!(settings.generation.source_extensions, GenerationSettings::default().source_extensions);
}

#[test]
fn later_payloads_override_earlier_ones() {
    let first = Settings::from_lsp_payload(Some(&json!({ "compiler": { "standard": "c++17" } })));
    let second = first.merged_with_payload(&json!({ "stubgen": { "logging": { "level": "trace" } } }));
    assert_eq!(second.compiler.standard, "c++17");
    assert_eq!(second.logging.level, LogLevel::Trace);
}

#[test]
fn invalid_section_is_ignored() {
    let payload = json!({ "compiler": { "includePaths": "not-a-list" } });
    let settings = Settings::from_lsp_payload(Some(&payload));
    assert_eq!(settings, Settings::default());
}

#[test]
fn header_and_source_roles_follow_extensions() {
    let generation = GenerationSettings::default();
    assert!(generation.is_header(Path::new("widget.hpp")));
    assert!(generation.is_header(Path::new("widget.h")));
    assert!(generation.is_source(Path::new("widget.cxx")));
    assert!(!generation.is_source(Path::new("widget.hpp")));
    assert!(!generation.is_header(Path::new("Makefile")));
}

#[test]
fn discovers_toml_in_parent_directory() {
    let root = unique_temp_dir("discover");
    let nested = root.join("src").join("widgets");
    std::fs::create_dir_all(&nested).expect("temp dir");
    std::fs::write(
        root.join(CONFIG_FILENAME),
        "[stubgen.compiler]\nstandard = \"c++20\"\nincludePaths = [\"include\"]\n\n[stubgen.generation]\nsetter = false\n",
    )
    .expect("write config");
    let header = nested.join("widget.hpp");
    std::fs::write(&header, "").expect("write header");

    assert_eq!(find_config(&header), Some(root.join(CONFIG_FILENAME)));
    let settings = Settings::discover(&header);
    assert_eq!(settings.compiler.standard, "c++20");
    assert_eq!(settings.compiler.include_paths, vec!["include"]);
    assert!(!settings.generation.setter);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn malformed_toml_is_an_error_but_discovery_falls_back() {
    let root = unique_temp_dir("malformed");
    std::fs::create_dir_all(&root).expect("temp dir");
    let config = root.join(CONFIG_FILENAME);
    std::fs::write(&config, "[compiler\nstandard = ").expect("write config");

    assert!(matches!(Settings::default().merged_with_file(&config), Err(ConfigError::Parse { .. })));
    assert_eq!(Settings::discover(&root), Settings::default());

    let _ = std::fs::remove_dir_all(root);
}
