use super::*;
use crate::editor::Workspace;

fn workspace(open: &[&str]) -> Workspace {
    let mut workspace = Workspace::new("/project/widget.hpp", (1, 1));
    for path in open {
        workspace.open_buffer(path, "");
    }
    workspace
}

#[test]
fn header_input_pairs_with_open_source() {
    let editor = workspace(&["/project/widget.hpp", "/project/widget.cpp"]);
    let files =
        FileSet::resolve(&editor, Path::new("/project/widget.hpp"), false, &GenerationSettings::default()).unwrap();

    assert_eq!(files.header.as_deref(), Some(Path::new("/project/widget.hpp")));
    assert_eq!(files.source.as_deref(), Some(Path::new("/project/widget.cpp")));
    assert_eq!(files.output, PathBuf::from("/project/widget.cpp"));
    assert!(files.is_input_header());
    assert!(!files.is_output_header());
    assert_eq!(files.companions().count(), 2);
}

#[test]
fn force_inline_targets_the_header() {
    let editor = workspace(&["/project/widget.hpp", "/project/widget.cpp"]);
    let files =
        FileSet::resolve(&editor, Path::new("/project/widget.hpp"), true, &GenerationSettings::default()).unwrap();
    assert_eq!(files.output, PathBuf::from("/project/widget.hpp"));
    assert!(files.is_output_header());
}

#[test]
fn missing_source_falls_back_to_the_header() {
    let editor = workspace(&["/project/widget.hpp"]);
    let files =
        FileSet::resolve(&editor, Path::new("/project/widget.hpp"), false, &GenerationSettings::default()).unwrap();
    assert_eq!(files.source, None);
    assert_eq!(files.output, PathBuf::from("/project/widget.hpp"));
}

#[test]
fn extension_priority_follows_settings() {
    let editor = workspace(&["/project/widget.h", "/project/widget.cxx", "/project/widget.c"]);
    let files =
        FileSet::resolve(&editor, Path::new("/project/widget.h"), false, &GenerationSettings::default()).unwrap();
    assert_eq!(files.source.as_deref(), Some(Path::new("/project/widget.cxx")));
}

#[test]
fn unrelated_file_without_companions_is_an_error() {
    let editor = workspace(&["/project/notes.txt"]);
    let err = FileSet::resolve(&editor, Path::new("/project/notes.txt"), false, &GenerationSettings::default())
        .expect_err("no companion");
    assert!(matches!(err, StubError::MissingCompanion(_)));
}

#[test]
fn inline_file_pairs_with_both_companions() {
    let editor = workspace(&["/project/widget.inl", "/project/widget.hpp", "/project/widget.cpp"]);
    let files =
        FileSet::resolve(&editor, Path::new("/project/widget.inl"), false, &GenerationSettings::default()).unwrap();
    assert_eq!(files.header.as_deref(), Some(Path::new("/project/widget.hpp")));
    assert_eq!(files.output, PathBuf::from("/project/widget.cpp"));
    assert!(!files.is_input_header());
}
