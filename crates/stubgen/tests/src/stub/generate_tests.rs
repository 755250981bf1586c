use super::*;
use crate::editor::Workspace;

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

#[test]
fn stub_lines_keep_the_blank_body_and_trailer() {
    let stub = Stub {
        text: "void Widget::draw()\n{\n \n}\n ".to_owned(),
        point: InsertionPoint::EndOfFile,
    };
    assert_eq!(stub.lines(), vec!["void Widget::draw()", "{", " ", "}", " "]);
}

#[test]
fn end_of_file_goes_above_the_last_endif() {
    let header = lines("#ifndef WIDGET_H\n#define WIDGET_H\nclass Widget {};\n#endif // WIDGET_H\n");
    assert_eq!(end_of_file_index(&header, true), 3);
    assert_eq!(end_of_file_index(&header, false), 4);
}

#[test]
fn endif_in_the_first_two_lines_is_ignored() {
    let header = lines("#if 0\n#endif\nint x;\n");
    assert_eq!(end_of_file_index(&header, true), 3);
}

#[test]
fn spaced_endif_is_recognised() {
    let header = lines("#ifndef A\n#define A\nint x;\n  #  endif\n\n");
    assert_eq!(end_of_file_index(&header, true), 3);
}

#[test]
fn line_text_prefers_the_open_buffer() {
    let mut workspace = Workspace::new("/project/widget.hpp", (1, 1));
    workspace.open_buffer("/project/widget.hpp", "first\nsecond\n");
    assert_eq!(line_text(&workspace, Path::new("/project/widget.hpp"), 2).as_deref(), Some("second"));
    assert_eq!(line_text(&workspace, Path::new("/project/widget.hpp"), 0), None);
    assert_eq!(line_text(&workspace, Path::new("/project/widget.hpp"), 9), None);
}

#[test]
fn overlays_cover_open_buffers_once() {
    let mut workspace = Workspace::new("/project/widget.hpp", (1, 1));
    workspace.open_buffer("/project/widget.hpp", "class Widget {};");
    let paths = vec![
        PathBuf::from("/project/widget.hpp"),
        PathBuf::from("/project/widget.cpp"),
        PathBuf::from("/project/widget.hpp"),
    ];

    let overlays = collect_overlays(&workspace, &paths);
    assert_eq!(overlays, vec![Overlay::new("/project/widget.hpp", "class Widget {};\n")]);
}
