// Camera registry
//
// Owns the id → configuration → recorder mapping. Mutations are serialized
// behind a dedicated lock; the camera map itself is only write-locked for
// the brief insert or remove, never across a process spawn or wait, so
// reads stay responsive while an unrelated camera's process is stopping.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::supervisor::error::{SupervisorError, SupervisorResult};
use crate::supervisor::recorder::{Recorder, RecorderSettings};
use crate::supervisor::store::ConfigStore;
use crate::supervisor::types::{CameraConfig, CameraId, CameraRecord, CameraRecordMap};

struct CameraEntry {
    config: CameraConfig,
    recorder: Arc<Mutex<Recorder>>,
}

/// Registry of cameras and their recording processes
///
/// Construction is side-effect free; call [`initialize`](Self::initialize)
/// to rehydrate persisted cameras and start their recorders.
pub struct CameraRegistry {
    cameras: RwLock<HashMap<CameraId, CameraEntry>>,
    store: Arc<dyn ConfigStore>,
    settings: RecorderSettings,
    // Serializes add/remove/initialize/shutdown against each other
    mutation: Mutex<()>,
}

impl CameraRegistry {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self::with_settings(store, RecorderSettings::default())
    }

    pub fn with_settings(store: Arc<dyn ConfigStore>, settings: RecorderSettings) -> Self {
        Self {
            cameras: RwLock::new(HashMap::new()),
            store,
            settings,
            mutation: Mutex::new(()),
        }
    }

    /// Rehydrate persisted cameras and start one recorder per entry.
    ///
    /// A camera whose process fails to launch stays registered without an
    /// active process; it never aborts initialization of the others.
    pub async fn initialize(&self) -> SupervisorResult<()> {
        let _guard = self.mutation.lock().await;
        let records = self.store.load().await?;

        // Entries already registered keep their running process untouched
        let (known_ids, mut seen_roots): (HashSet<CameraId>, HashSet<PathBuf>) = {
            let cameras = self.cameras.read().await;
            (
                cameras.keys().cloned().collect(),
                cameras
                    .values()
                    .map(|entry| entry.config.storage_root.clone())
                    .collect(),
            )
        };

        for (id, record) in records {
            if known_ids.contains(&id) {
                continue;
            }
            let config = record.into_config(id.clone());
            if !seen_roots.insert(config.storage_root.clone()) {
                log::warn!(
                    "skipping camera '{}': storage root '{}' already in use",
                    id,
                    config.storage_root.display()
                );
                continue;
            }

            let mut recorder = Recorder::new(config.clone(), self.settings.clone());
            if let Err(e) = recorder.start().await {
                log::warn!("camera '{}' registered but not recording: {}", id, e);
            }

            self.cameras.write().await.insert(
                id,
                CameraEntry {
                    config,
                    recorder: Arc::new(Mutex::new(recorder)),
                },
            );
        }
        Ok(())
    }

    /// Register a camera, persist it, and start its recording process.
    ///
    /// Directory preparation failure is surfaced to the caller and rolls the
    /// persisted set back; a spawn failure leaves the camera registered but
    /// not recording and is not an error.
    pub async fn add_camera(&self, config: CameraConfig) -> SupervisorResult<()> {
        let _guard = self.mutation.lock().await;

        let previous = {
            let cameras = self.cameras.read().await;
            if cameras.contains_key(&config.id) {
                return Err(SupervisorError::DuplicateIdentity(config.id));
            }
            if cameras
                .values()
                .any(|entry| entry.config.storage_root == config.storage_root)
            {
                return Err(SupervisorError::DuplicateStorageRoot(config.storage_root));
            }
            Self::records_of(&cameras)
        };

        let mut records = previous.clone();
        records.insert(config.id.clone(), CameraRecord::from(&config));
        self.store.save(&records).await?;

        let mut recorder = Recorder::new(config.clone(), self.settings.clone());
        match recorder.start().await {
            Ok(()) => {}
            Err(SupervisorError::LaunchFailure(reason)) => {
                log::warn!("camera '{}' added but not recording: {}", config.id, reason);
            }
            Err(e) => {
                if let Err(rollback) = self.store.save(&previous).await {
                    log::error!(
                        "failed to roll back persisted config for camera '{}': {}",
                        config.id,
                        rollback
                    );
                }
                return Err(e);
            }
        }

        self.cameras.write().await.insert(
            config.id.clone(),
            CameraEntry {
                config,
                recorder: Arc::new(Mutex::new(recorder)),
            },
        );
        Ok(())
    }

    /// Stop a camera's recording process and remove it from the registry.
    ///
    /// The process is confirmed stopped before the entry disappears, so a
    /// concurrent observer never sees a camera id with an unmanaged process.
    pub async fn remove_camera(&self, id: &str) -> SupervisorResult<()> {
        let _guard = self.mutation.lock().await;

        let recorder = {
            let cameras = self.cameras.read().await;
            let entry = cameras
                .get(id)
                .ok_or_else(|| SupervisorError::NotFound(id.to_string()))?;
            Arc::clone(&entry.recorder)
        };

        recorder.lock().await.stop().await?;

        let records = {
            let mut cameras = self.cameras.write().await;
            cameras.remove(id);
            Self::records_of(&cameras)
        };
        self.store.save(&records).await?;

        log::info!("removed camera '{}'", id);
        Ok(())
    }

    /// Read-only snapshot of all current camera configurations
    pub async fn list_cameras(&self) -> Vec<CameraConfig> {
        self.cameras
            .read()
            .await
            .values()
            .map(|entry| entry.config.clone())
            .collect()
    }

    /// Resolve a camera's storage root, for the delivery layer
    pub async fn storage_root(&self, id: &str) -> SupervisorResult<PathBuf> {
        let cameras = self.cameras.read().await;
        cameras
            .get(id)
            .map(|entry| entry.config.storage_root.clone())
            .ok_or_else(|| SupervisorError::NotFound(id.to_string()))
    }

    /// Resolve a camera's retention horizon in days
    pub async fn retention_horizon(&self, id: &str) -> SupervisorResult<u32> {
        let cameras = self.cameras.read().await;
        cameras
            .get(id)
            .map(|entry| entry.config.retention_days)
            .ok_or_else(|| SupervisorError::NotFound(id.to_string()))
    }

    /// Whether the camera's recording process is currently alive
    pub async fn is_recording(&self, id: &str) -> SupervisorResult<bool> {
        let recorder = {
            let cameras = self.cameras.read().await;
            let entry = cameras
                .get(id)
                .ok_or_else(|| SupervisorError::NotFound(id.to_string()))?;
            Arc::clone(&entry.recorder)
        };
        Ok(recorder.lock().await.is_running())
    }

    /// Stop every recording process, leaving configuration intact.
    ///
    /// Used for clean process teardown; each exit is confirmed before
    /// returning.
    pub async fn shutdown(&self) -> SupervisorResult<()> {
        let _guard = self.mutation.lock().await;

        let recorders: Vec<(CameraId, Arc<Mutex<Recorder>>)> = {
            let cameras = self.cameras.read().await;
            cameras
                .iter()
                .map(|(id, entry)| (id.clone(), Arc::clone(&entry.recorder)))
                .collect()
        };

        for (id, recorder) in recorders {
            if let Err(e) = recorder.lock().await.stop().await {
                log::warn!("failed to stop recorder for camera '{}': {}", id, e);
            }
        }
        Ok(())
    }

    fn records_of(cameras: &HashMap<CameraId, CameraEntry>) -> CameraRecordMap {
        cameras
            .iter()
            .map(|(id, entry)| (id.clone(), CameraRecord::from(&entry.config)))
            .collect()
    }
}
