// Camera configuration persistence seam
//
// The registry delegates durable storage through `ConfigStore` and never
// cares how records reached it. `JsonFileStore` keeps the keyed-JSON layout
// the rest of the stack expects; `MemoryStore` backs tests and embedders
// that persist elsewhere.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::supervisor::error::{SupervisorError, SupervisorResult};
use crate::supervisor::types::CameraRecordMap;

/// Durable storage for the persisted camera set
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load every persisted camera record, keyed by camera id
    async fn load(&self) -> SupervisorResult<CameraRecordMap>;

    /// Replace the persisted set with the given snapshot
    async fn save(&self, records: &CameraRecordMap) -> SupervisorResult<()>;
}

/// JSON-file backed store
///
/// A missing file is an empty camera set, not an error.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn load(&self) -> SupervisorResult<CameraRecordMap> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SupervisorError::persistence(format!(
                    "invalid camera config '{}': {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(SupervisorError::persistence(format!(
                "failed to read '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, records: &CameraRecordMap) -> SupervisorResult<()> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| SupervisorError::persistence(e.to_string()))?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            SupervisorError::persistence(format!(
                "failed to write '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// In-memory store for tests and embedders with external persistence
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<CameraRecordMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current persisted snapshot, for inspection
    pub async fn snapshot(&self) -> CameraRecordMap {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load(&self) -> SupervisorResult<CameraRecordMap> {
        Ok(self.records.lock().await.clone())
    }

    async fn save(&self, records: &CameraRecordMap) -> SupervisorResult<()> {
        *self.records.lock().await = records.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::types::CameraRecord;

    fn sample_records() -> CameraRecordMap {
        let mut records = HashMap::new();
        records.insert(
            "cam1".to_string(),
            CameraRecord {
                name: "Front door".to_string(),
                source_url: "rtsp://example/front".to_string(),
                storage_root: PathBuf::from("/srv/cams/front"),
                retention_days: 7,
            },
        );
        records
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cameras.json"));

        let records = sample_records();
        store.save(&records).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        let loaded = store.load().await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_json_store_rejects_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cameras.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(SupervisorError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store_save_replaces_snapshot() {
        let store = MemoryStore::new();
        store.save(&sample_records()).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);

        store.save(&HashMap::new()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
