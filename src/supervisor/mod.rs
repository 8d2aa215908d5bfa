// Camera Recording Supervision
//
// This module owns the mapping from a logical camera identity to an external
// recording process, the on-disk split between archival recordings and
// rolling HLS streaming segments, and age-based reclamation of archival
// storage.

pub mod error;
pub mod recorder;
pub mod registry;
pub mod retention;
pub mod store;
pub mod types;

pub use error::{SupervisorError, SupervisorResult};
pub use recorder::{Recorder, RecorderSettings, build_ffmpeg_args};
pub use registry::CameraRegistry;
pub use retention::{spawn_retention_task, sweep};
pub use store::{ConfigStore, JsonFileStore, MemoryStore};
pub use types::{CameraConfig, CameraId, CameraRecord, CameraRecordMap, StreamQuality};
