//! Error types for sentrycam operations.

use thiserror::Error;

/// Primary error type for camera and storage operations.
#[derive(Error, Debug)]
pub enum CamError {
    // Camera errors
    #[error("Failed to open camera {index}: {reason}")]
    DeviceOpenFailed { index: u32, reason: String },

    #[error("Camera read failed: {0}")]
    ReadFailed(String),

    #[error("JPEG encoding failed: {0}")]
    EncodeFailed(String),

    // Storage errors
    #[error("Snapshot not found: {name}")]
    SnapshotNotFound { name: String },

    #[error("Invalid snapshot name: {name}")]
    InvalidSnapshotName { name: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // Web server errors
    #[error("Web server failed to start on {addr}: {reason}")]
    WebServerFailed { addr: String, reason: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl CamError {
    /// Returns true if the error came from the capture path and should
    /// feed the session's consecutive-failure counter.
    pub const fn is_capture_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceOpenFailed { .. } | Self::ReadFailed(_) | Self::EncodeFailed(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DeviceOpenFailed { .. } => {
                Some("Check that the camera is connected and not held by another process")
            }
            Self::SnapshotNotFound { .. } => Some("Run: sentrycam gallery"),
            Self::ConfigNotFound { .. } => Some("Create a config file or rely on defaults"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using CamError.
pub type Result<T> = std::result::Result<T, CamError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CamError::Other(format!("{}: {e}", f().into())))
    }
}
