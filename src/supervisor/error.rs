// Supervisor error types and result alias

use std::path::PathBuf;

use thiserror::Error;

use crate::supervisor::types::CameraId;

/// Result type for supervisor operations
pub type SupervisorResult<T> = std::result::Result<T, SupervisorError>;

/// Errors that can occur while supervising camera recordings
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A camera with this id is already registered
    #[error("camera '{0}' is already registered")]
    DuplicateIdentity(CameraId),

    /// Another camera already records into this storage root
    #[error("storage root '{}' is already in use by another camera", .0.display())]
    DuplicateStorageRoot(PathBuf),

    /// No camera with this id is registered
    #[error("camera '{0}' not found")]
    NotFound(CameraId),

    /// The external recording process could not be spawned
    #[error("failed to launch recording process: {0}")]
    LaunchFailure(String),

    /// Directory creation, process wait, or file deletion failed
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// Camera configuration could not be loaded or saved
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl SupervisorError {
    /// Create a launch failure error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::LaunchFailure(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
