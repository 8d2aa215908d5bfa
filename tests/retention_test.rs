// Retention sweep integration tests

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use camwarden::supervisor::sweep;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Create a file and backdate its modification time
fn aged_file(dir: &Path, name: &str, age: Duration) {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

#[tokio::test]
async fn test_sweep_removes_only_files_past_the_horizon() {
    let dir = tempfile::tempdir().unwrap();
    aged_file(dir.path(), "20260815_090000.mp4", 10 * DAY);
    aged_file(dir.path(), "20260824_090000.mp4", DAY);

    let removed = sweep(dir.path(), 5).await.unwrap();

    assert_eq!(removed, vec![dir.path().join("20260815_090000.mp4")]);
    assert!(!dir.path().join("20260815_090000.mp4").exists());
    assert!(dir.path().join("20260824_090000.mp4").exists());
}

#[tokio::test]
async fn test_sweep_is_reentrant() {
    let dir = tempfile::tempdir().unwrap();
    aged_file(dir.path(), "20260810_090000.mp4", 15 * DAY);

    let first = sweep(dir.path(), 5).await.unwrap();
    assert_eq!(first.len(), 1);

    let second = sweep(dir.path(), 5).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_sweep_ignores_streaming_segments_and_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let segments = dir.path().join("streams").join("low");
    std::fs::create_dir_all(&segments).unwrap();

    aged_file(&segments, "index.m3u8", 10 * DAY);
    aged_file(&segments, "segment0.ts", 10 * DAY);
    aged_file(dir.path(), "notes.txt", 10 * DAY);

    let removed = sweep(dir.path(), 5).await.unwrap();

    assert!(removed.is_empty());
    assert!(segments.join("index.m3u8").exists());
    assert!(segments.join("segment0.ts").exists());
    assert!(dir.path().join("notes.txt").exists());
}

#[tokio::test]
async fn test_sweep_on_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("removed-camera");

    let removed = sweep(&gone, 5).await.unwrap();
    assert!(removed.is_empty());
}

#[tokio::test]
async fn test_sweep_with_zero_horizon_removes_any_past_file() {
    let dir = tempfile::tempdir().unwrap();
    aged_file(dir.path(), "20260825_080000.mp4", Duration::from_secs(60));

    let removed = sweep(dir.path(), 0).await.unwrap();
    assert_eq!(removed.len(), 1);
}
