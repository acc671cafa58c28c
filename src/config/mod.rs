//! Application configuration.
//!
//! Settings come from an optional TOML file, overridden by CLI flags (which
//! themselves carry `SENTRYCAM_*` environment fallbacks). Every field has a
//! default matching the original fixed constants, so the application runs
//! with no config file at all.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::{DEFAULT_FRAME_DELAY, DEFAULT_RECOVERY_THRESHOLD, SessionOptions};
use crate::error::{CamError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub camera: CameraConfig,
    pub storage: StorageConfig,
    pub trigger: TriggerConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    pub bind: String,
    /// Listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Camera settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Logical device index (0 is the first camera).
    pub index: u32,
    /// Consecutive read failures before the handle is recycled.
    pub recovery_threshold: u32,
    /// Delay between stream frames, in milliseconds (~25 fps at 40).
    pub frame_delay_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            recovery_threshold: DEFAULT_RECOVERY_THRESHOLD,
            frame_delay_ms: DEFAULT_FRAME_DELAY.as_millis() as u64,
        }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding snapshot JPEGs.
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("pictures"),
        }
    }
}

/// Hardware trigger settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TriggerConfig {
    /// How long the indicator stays lit after a triggered snapshot, in ms.
    pub hold_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self { hold_ms: 500 }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist and parse. With `None`,
    /// the default location is used when present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CamError::ConfigNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::load_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config file");
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CamError::ConfigParse(e.to_string()))
    }

    /// Default config file location: `<config dir>/sentrycam/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sentrycam").join("config.toml"))
    }

    /// The socket address to serve on.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.bind, self.server.port)
            .parse()
            .map_err(|e| {
                CamError::ConfigInvalid(format!(
                    "invalid bind address {}:{}: {e}",
                    self.server.bind, self.server.port
                ))
            })
    }

    /// Session tunables derived from the camera section.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            recovery_threshold: self.camera.recovery_threshold,
            frame_delay: Duration::from_millis(self.camera.frame_delay_ms),
        }
    }

    /// Indicator hold duration for triggered snapshots.
    #[must_use]
    pub fn trigger_hold(&self) -> Duration {
        Duration::from_millis(self.trigger.hold_ms)
    }
}
