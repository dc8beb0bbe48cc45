//! Tests for configuration loading.

use std::io::Write;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};

use typing_tutor::{StorageKind, TutorConfig};

#[test]
fn test_from_file_reads_all_sections() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        r#"
storage = "json"
data_dir = "/tmp/typing-tutor-test"

[timings]
next_word_ms = 250

[progression]
promote_at = 90.0
"#
    )
    .expect("Write failed");

    let config = TutorConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(*config.storage(), StorageKind::Json);
    assert_eq!(
        config.resolved_data_dir(),
        std::path::PathBuf::from("/tmp/typing-tutor-test")
    );
    assert_eq!(config.timings().next_word(), Duration::from_millis(250));
    assert_eq!(config.timings().shake(), Duration::from_millis(300));
    assert_eq!(*config.progression().promote_at(), 90.0);
    assert_eq!(*config.progression().demote_below(), 40.0);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = TutorConfig::resolve(Some(&dir.path().join("nope.toml")));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_error() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "storage = [").expect("Write failed");
    let err = TutorConfig::from_file(file.path()).expect_err("Should fail");
    assert!(err.to_string().starts_with("Config error: Failed to parse config"));
}

#[test]
fn test_open_store_creates_sqlite_database() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = TutorConfig::default().with_data_dir(dir.path().join("nested"));
    let store = config.open_store().expect("Open failed");
    store.set("k", "v").expect("Set failed");
    assert!(dir.path().join("nested").join(typing_tutor::DB_FILE).is_file());
}

#[test]
fn test_memory_storage_keeps_nothing_on_disk() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = TutorConfig::default()
        .with_storage(StorageKind::Memory)
        .with_data_dir(dir.path());
    let store = config.open_store().expect("Open failed");
    store.set("k", "v").expect("Set failed");
    assert_eq!(std::fs::read_dir(dir.path()).expect("Read dir failed").count(), 0);
}
