use super::*;

fn doc(text: &str) -> Document {
    Document::new(PathBuf::from("/project/widget.hpp"), text.to_string(), 1)
}

#[test]
fn lines_ignore_the_final_newline() {
    let document = doc("a\nb\n");
    assert_eq!(document.line_count(), 2);
    assert_eq!(document.lines(), vec!["a", "b"]);

    let unterminated = doc("a\nb");
    assert_eq!(unterminated.line_count(), 2);
    assert_eq!(unterminated.line_text(1), Some("b"));
    assert_eq!(unterminated.line_text(2), None);
}

#[test]
fn empty_document_has_no_lines() {
    let document = doc("");
    assert_eq!(document.line_count(), 0);
    assert!(document.lines().is_empty());
}

#[test]
fn crlf_is_stripped_from_line_text() {
    let document = doc("int a;\r\nint b;\r\n");
    assert_eq!(document.line_text(0), Some("int a;"));
}

#[test]
fn insert_lines_splices_and_bumps_version() {
    let mut document = doc("first\nlast\n");
    document.insert_lines(1, &["middle".to_string(), "".to_string()]);
    assert_eq!(document.text, "first\nmiddle\n\nlast\n");
    assert_eq!(document.version, 2);
    assert_eq!(document.line_text(3), Some("last"));
}

#[test]
fn insert_lines_past_the_end_appends() {
    let mut document = doc("only");
    document.insert_lines(10, &["tail".to_string()]);
    assert_eq!(document.text, "only\ntail");

    let mut empty = doc("");
    empty.insert_lines(0, &["void f();".to_string()]);
    assert_eq!(empty.text, "void f();\n");
}

#[test]
fn incremental_change_replaces_the_range() {
    use tower_lsp::lsp_types::{Position, Range};

    let mut document = doc("int a;\nint b;\n");
    document.apply_changes(
        vec![TextDocumentContentChangeEvent {
            range: Some(Range::new(Position::new(1, 4), Position::new(1, 5))),
            range_length: None,
            text: "count".to_string(),
        }],
        2,
    );
    assert_eq!(document.text, "int a;\nint count;\n");
    assert_eq!(document.version, 2);
    assert_eq!(document.line_text(1), Some("int count;"));
}

#[test]
fn full_change_replaces_everything() {
    let mut document = doc("int a;\n");
    document.apply_changes(
        vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "void f();\n".to_string(),
        }],
        5,
    );
    assert_eq!(document.lines(), vec!["void f();"]);
}
