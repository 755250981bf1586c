use super::*;

#[test]
fn store_open_get_content_close() {
    let store = DocumentStore::new();
    let path = Path::new("/project/widget.hpp");
    store.open(path, "void f();".to_string(), 1);

    assert_eq!(store.get_content(path), Some("void f();".to_string()));
    assert!(store.contains(path));

    store.close(path);
    assert!(store.get_content(path).is_none());
}

#[test]
fn store_update_existing() {
    let store = DocumentStore::new();
    let path = Path::new("/project/widget.hpp");
    store.open(path, "v1".to_string(), 1);
    store.update(path, "v2".to_string(), 2);
    let doc = store.get(path).unwrap();
    assert_eq!(doc.text, "v2");
    assert_eq!(doc.version, 2);
}

#[test]
fn store_update_unknown_creates() {
    let store = DocumentStore::new();
    let path = Path::new("/project/new.hpp");
    store.update(path, "content".to_string(), 1);
    assert!(store.get_content(path).is_some());
}

#[test]
fn store_insert_lines_only_touches_open_buffers() {
    let store = DocumentStore::new();
    let path = Path::new("/project/widget.cpp");
    store.open(path, "a\nc\n".to_string(), 1);

    assert!(store.insert_lines(path, 1, &["b".to_string()]));
    assert_eq!(store.get_content(path).as_deref(), Some("a\nb\nc\n"));
    assert!(!store.insert_lines(Path::new("/project/closed.cpp"), 0, &["x".to_string()]));
}

#[test]
fn store_lists_paths_and_snapshots() {
    let store = DocumentStore::new();
    store.open(Path::new("/project/a.hpp"), "a".to_string(), 1);
    store.open(Path::new("/project/b.hpp"), "b".to_string(), 1);

    let mut paths = store.all_paths();
    paths.sort();
    assert_eq!(paths, vec![PathBuf::from("/project/a.hpp"), PathBuf::from("/project/b.hpp")]);
    assert_eq!(store.snapshot().len(), 2);
}
