use std::path::PathBuf;

use super::*;

fn unique_temp_dir(name: &str) -> PathBuf {
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("valid clock")
        .as_nanos();
    std::env::temp_dir().join(format!("stubgen-compiler-{name}-{}-{nonce}", std::process::id()))
}

#[test]
fn ast_dump_args_default_flags() {
    let settings = CompilerSettings::default();
    let args = ast_dump_args(&settings, Path::new("/project/widget.hpp"), Path::new("/project/widget.hpp"));
    assert_eq!(
        args,
        vec![
            "-x",
            "c++",
            "-std=c++11",
            "-fsyntax-only",
            "-fno-color-diagnostics",
            "-Xclang",
            "-ast-dump=json",
            "-Xclang",
            "-skip-function-bodies",
            "-I/project",
            "/project/widget.hpp",
        ]
    );
}

#[test]
fn ast_dump_args_include_user_settings_and_overlay_target() {
    let settings = CompilerSettings {
        standard: "c++17".to_string(),
        include_paths: vec!["/project".to_string(), "/opt/include".to_string()],
        extra_flags: vec!["-DSTUB=1".to_string()],
        skip_function_bodies: false,
        ..CompilerSettings::default()
    };
    let args = ast_dump_args(&settings, Path::new("/project/widget.cpp"), Path::new("/tmp/overlay/widget.cpp"));

    assert!(args.contains(&"-std=c++17".to_string()));
    assert!(!args.contains(&"-skip-function-bodies".to_string()));
    assert_eq!(args.iter().filter(|arg| *arg == "-I/project").count(), 1, "duplicate include dirs: {args:?}");
    assert!(args.contains(&"-I/opt/include".to_string()));
    assert_eq!(args[args.len() - 2], "-DSTUB=1");
    assert_eq!(args.last().map(String::as_str), Some("/tmp/overlay/widget.cpp"));
}

#[test]
fn parsed_file_joins_overlays_of_its_companions() {
    let dir = unique_temp_dir("parsed");
    std::fs::create_dir_all(&dir).expect("temp dir");
    let source = dir.join("widget.cpp");
    std::fs::write(&source, "#include \"widget.hpp\"\n").expect("write source");
    let header = dir.join("widget.hpp");

    let overlays = with_parsed_file(&source, &[Overlay::new(&header, "void f();\n")]);
    assert_eq!(overlays.len(), 2);
    assert_eq!(overlays[1].contents, "#include \"widget.hpp\"\n");

    assert!(with_parsed_file(&source, &[]).is_empty());

    let own = with_parsed_file(&source, &[Overlay::new(&source, "// unsaved\n")]);
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].contents, "// unsaved\n");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn overlay_dir_maps_copies_back_and_cleans_up() {
    let overlays = vec![Overlay::new("/project/widget.hpp", "struct W {};\n")];
    let temp_dir;
    {
        let dump = OverlayDir::create(&overlays).expect("overlay dir");
        temp_dir = dump.dir.clone();
        let copy = dump.path_for(Path::new("/project/widget.hpp")).expect("copy of overlaid file");
        assert_eq!(copy.file_name().and_then(|name| name.to_str()), Some("widget.hpp"));
        assert_eq!(std::fs::read_to_string(&copy).expect("read copy"), "struct W {};\n");
        assert_eq!(dump.path_map.get(&copy.display().to_string()), Some(&PathBuf::from("/project/widget.hpp")));
        assert_eq!(dump.texts().get(Path::new("/project/widget.hpp")).map(|text| &**text), Some("struct W {};\n"));
        assert!(dump.path_for(Path::new("/project/other.hpp")).is_none());
    }
    assert!(!temp_dir.exists(), "overlay dir must be removed on drop");
}

#[test]
fn no_overlays_creates_no_directory() {
    let dump = OverlayDir::create(&[]).expect("overlay dir");
    assert!(!dump.dir.exists());
    assert!(dump.path_map.is_empty());
}

#[test]
fn missing_compiler_is_a_toolchain_error() {
    let parser = ClangParser::new(CompilerSettings {
        clang_path: "stubgen-no-such-compiler".to_string(),
        ..CompilerSettings::default()
    });
    let Err(err) = parser.parse(Path::new("/project/widget.hpp"), &[]) else {
        panic!("a missing compiler must not produce a unit");
    };
    assert!(matches!(err, StubError::Toolchain { .. }), "unexpected error: {err}");
}
