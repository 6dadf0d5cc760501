use std::fs;

use tablero_client::{ensure_state_dir, StateFile};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn unwritten_state_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let file = StateFile::new(temp.path(), "filters.ron");
    assert_eq!(file.read().unwrap(), None);
}

#[test]
fn writes_replace_the_previous_content() {
    let temp = TempDir::new().unwrap();
    let file = StateFile::new(temp.path(), "filters.ron");

    file.write("(query: \"AB\")").unwrap();
    assert_eq!(file.read().unwrap().as_deref(), Some("(query: \"AB\")"));

    file.write("(query: \"CD\")").unwrap();
    assert_eq!(file.read().unwrap().as_deref(), Some("(query: \"CD\")"));
    assert_eq!(fs::read_to_string(file.path()).unwrap(), "(query: \"CD\")");
}

#[test]
fn no_partial_file_when_the_directory_is_unusable() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let file = StateFile::new(&blocker, "filters.ron");
    assert!(file.write("data").is_err());
    assert!(!blocker.join("filters.ron").exists());
}
