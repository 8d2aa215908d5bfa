// Age-based reclamation of archival recordings
//
// Sweeps only the flat `*.mp4` files directly under a camera's storage
// root. Rolling HLS segments under `streams/` are bounded by the recording
// process's own playlist window and are never touched here.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::supervisor::error::SupervisorResult;
use crate::supervisor::registry::CameraRegistry;

/// File extension of archival recordings
const ARCHIVE_EXTENSION: &str = "mp4";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Delete archival files older than `retention_days` under `directory`.
///
/// Returns the paths actually removed. Deletion is best-effort per file: a
/// file that vanishes between enumeration and deletion is skipped, and a
/// missing directory yields an empty result. Stateless and reentrant; an
/// immediate second sweep removes nothing.
pub async fn sweep(directory: &Path, retention_days: u32) -> SupervisorResult<Vec<PathBuf>> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = Vec::new();
    let mut entries = match tokio::fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(removed),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(ARCHIVE_EXTENSION) {
            continue;
        }

        // Vanished or unreadable entries are skipped, not errors
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        if modified >= cutoff {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("retention removed {}", path.display());
                removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                log::warn!("retention failed to remove {}: {}", path.display(), e);
            }
        }
    }

    Ok(removed)
}

/// Spawn the periodic retention task.
///
/// Each tick snapshots the registry and sweeps every camera's storage root
/// with that camera's own horizon. A camera removed mid-sweep is harmless;
/// its filesystem operations simply find nothing.
pub fn spawn_retention_task(registry: Arc<CameraRegistry>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            for camera in registry.list_cameras().await {
                match sweep(&camera.storage_root, camera.retention_days).await {
                    Ok(removed) if !removed.is_empty() => {
                        log::info!(
                            "camera '{}': reclaimed {} archival file(s)",
                            camera.id,
                            removed.len()
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("camera '{}': retention sweep failed: {}", camera.id, e);
                    }
                }
            }
        }
    })
}
