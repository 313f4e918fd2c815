//! Tests for the real FileSystem implementation

use std::fs;

use tempfile::TempDir;

use probtree::infrastructure::traits::{FileSystem, RealFileSystem};

#[test]
fn given_nested_path_when_ensure_parent_then_directories_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a/b/c/doc.json");

    RealFileSystem.ensure_parent(&path).unwrap();

    assert!(temp.path().join("a/b/c").is_dir());
    assert!(!path.exists());
}

#[test]
fn given_bare_file_name_when_ensure_parent_then_noop() {
    assert!(RealFileSystem
        .ensure_parent(std::path::Path::new("doc.json"))
        .is_ok());
}

#[test]
fn given_directory_when_read_dir_then_lists_direct_entries() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("one.json"), "{}").unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("sub/two.json"), "{}").unwrap();

    let mut entries = RealFileSystem.read_dir(temp.path()).unwrap();
    entries.sort();

    assert_eq!(
        entries,
        vec![temp.path().join("one.json"), temp.path().join("sub")]
    );
}

#[test]
fn given_written_file_when_reading_then_content_matches() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.json");

    RealFileSystem.write(&path, "{\"data\": null}").unwrap();

    assert!(RealFileSystem.exists(&path));
    assert!(!RealFileSystem.is_dir(&path));
    assert_eq!(RealFileSystem.read_to_string(&path).unwrap(), "{\"data\": null}");
}
