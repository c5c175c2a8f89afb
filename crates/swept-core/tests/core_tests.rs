use std::path::{Path, PathBuf};
use std::time::SystemTime;

use swept_core::{
    sort_entries_by_size, DeleteError, Entry, EntryId, EnumerateError, PathSet, ScanResult,
    SessionConfig, SessionError, SizeResult,
};

fn dir(id: u64, name: &str) -> Entry {
    Entry::directory(EntryId::new(id), name, format!("/home/u/{name}"), Some(1))
}

fn file(id: u64, name: &str, size: u64) -> Entry {
    Entry::file(EntryId::new(id), name, format!("/home/u/{name}"), size)
}

#[test]
fn test_entry_constructors() {
    let now = SystemTime::now();
    let entry = file(1, "notes.txt", 2048).with_modified(Some(now));

    assert!(!entry.is_dir);
    assert_eq!(entry.size, 2048);
    assert_eq!(entry.child_count, None);
    assert_eq!(entry.modified, Some(now));
    assert_eq!(entry.path, PathBuf::from("/home/u/notes.txt"));

    let directory = dir(2, "Library");
    assert!(directory.is_dir);
    assert_eq!(directory.size, 0);
}

#[test]
fn test_scan_result_helpers() {
    let result = ScanResult::new(
        "/home/u",
        Some(PathBuf::from("/home")),
        vec![dir(1, "Library"), file(2, "a.bin", 10), dir(3, "Music"), file(4, "b.bin", 5)],
    );

    assert_eq!(result.len(), 4);
    assert!(!result.is_empty());
    assert_eq!(result.total_size, 15);
    assert_eq!(result.directories().count(), 2);
    assert_eq!(result.find(Path::new("/home/u/a.bin")).map(|e| e.size), Some(10));
    assert!(result.find(Path::new("/home/u/missing")).is_none());
}

#[test]
fn test_sort_entries_descending_and_stable() {
    let mut entries = vec![dir(1, "x"), file(2, "big", 100), dir(3, "y"), file(4, "mid", 50)];
    sort_entries_by_size(&mut entries);

    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    // Both directories are 0 bytes and keep their original relative order.
    assert_eq!(names, vec!["big", "mid", "x", "y"]);
}

#[test]
fn test_size_result_zero() {
    let result = SizeResult::zero(Path::new("/home/u/locked"));
    assert_eq!(result.size, 0);
    assert_eq!(result.path, PathBuf::from("/home/u/locked"));
}

#[test]
fn test_path_set_is_a_value() {
    let loading = PathSet::new().marked(["/a", "/b", "/c"]);
    let done = loading.unmarked(["/a", "/b", "/c"]);

    assert_eq!(loading.len(), 3);
    assert!(done.is_empty());
    assert!(!loading.same_as(&done));
}

#[test]
fn test_error_display() {
    let err = EnumerateError::io(
        "/root/secret",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );
    assert_eq!(err.to_string(), "Permission denied: /root/secret");

    let err = DeleteError::io(
        "/tmp/x",
        std::io::Error::new(std::io::ErrorKind::Other, "busy"),
    );
    assert!(err.to_string().starts_with("Failed to delete /tmp/x"));

    let err: SessionError = err.into();
    assert!(matches!(err, SessionError::Deletion(_)));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = SessionConfig::builder()
        .home("/Users/me")
        .batch_size(4usize)
        .build()
        .unwrap();

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed = SessionConfig::from_toml(&text);
    assert_eq!(parsed, config);
}
