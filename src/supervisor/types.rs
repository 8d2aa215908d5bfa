// Camera identity and configuration types
//
// `CameraConfig` is validated once at the boundary (store load or caller
// deserialization) and treated as trusted downstream. The persisted form is
// `CameraRecord`, keyed by camera id in the store.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unique camera identity, primary key of the registry
pub type CameraId = String;

/// Quality tier of the adaptive streaming output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamQuality {
    /// Downscaled, lower-bitrate variant
    Low,
    /// Full-resolution, higher-bitrate variant
    High,
}

impl StreamQuality {
    pub const ALL: [StreamQuality; 2] = [StreamQuality::Low, StreamQuality::High];

    /// Directory name of this tier under `{storage_root}/streams/`
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Configuration for a single camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConfig {
    /// Unique, immutable identity
    pub id: CameraId,
    /// Display name, metadata only
    pub name: String,
    /// Stream locator (e.g. an RTSP URL), passed verbatim to the recording
    /// process
    pub source_url: String,
    /// Absolute root for this camera's archival files and streaming
    /// segments; unique per camera
    pub storage_root: PathBuf,
    /// Age threshold in days for reclaiming archival files
    pub retention_days: u32,
}

impl CameraConfig {
    /// Directory holding the rolling segments for one quality tier
    pub fn stream_dir(&self, quality: StreamQuality) -> PathBuf {
        self.storage_root.join("streams").join(quality.dir_name())
    }

    /// Playlist path for one quality tier.
    ///
    /// Fixed contract with the delivery layer:
    /// `{storage_root}/streams/{quality}/index.m3u8`.
    pub fn playlist_path(&self, quality: StreamQuality) -> PathBuf {
        self.stream_dir(quality).join("index.m3u8")
    }
}

/// Persisted form of a camera configuration
///
/// The camera id is the map key in the store, not a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub name: String,
    pub source_url: String,
    pub storage_root: PathBuf,
    pub retention_days: u32,
}

/// Persisted camera set, keyed by camera id
pub type CameraRecordMap = HashMap<CameraId, CameraRecord>;

impl CameraRecord {
    /// Rebuild the full configuration from a persisted record and its key
    pub fn into_config(self, id: CameraId) -> CameraConfig {
        CameraConfig {
            id,
            name: self.name,
            source_url: self.source_url,
            storage_root: self.storage_root,
            retention_days: self.retention_days,
        }
    }
}

impl From<&CameraConfig> for CameraRecord {
    fn from(config: &CameraConfig) -> Self {
        Self {
            name: config.name.clone(),
            source_url: config.source_url.clone(),
            storage_root: config.storage_root.clone(),
            retention_days: config.retention_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(root: &str) -> CameraConfig {
        CameraConfig {
            id: "cam1".to_string(),
            name: "Front door".to_string(),
            source_url: "rtsp://example/stream".to_string(),
            storage_root: PathBuf::from(root),
            retention_days: 7,
        }
    }

    #[test]
    fn test_playlist_path_contract() {
        let config = camera("/srv/cams/front");
        assert_eq!(
            config.playlist_path(StreamQuality::Low),
            PathBuf::from("/srv/cams/front/streams/low/index.m3u8")
        );
        assert_eq!(
            config.playlist_path(StreamQuality::High),
            PathBuf::from("/srv/cams/front/streams/high/index.m3u8")
        );
    }

    #[test]
    fn test_record_round_trip_preserves_config() {
        let config = camera("/srv/cams/front");
        let record = CameraRecord::from(&config);
        assert_eq!(record.into_config("cam1".to_string()), config);
    }
}
