//! Camera capture abstraction layer.
//!
//! This module provides a trait-based abstraction over real and mock
//! capture backends, plus the [`CameraSession`] that owns the single
//! process-wide device handle and recovers it after repeated failures.

pub mod mock;
mod real;
mod session;

pub use real::NokhwaOpener;
pub use session::{
    CameraSession, DEFAULT_FRAME_DELAY, DEFAULT_RECOVERY_THRESHOLD, SessionOptions,
};

use image::RgbImage;

use crate::error::Result;

/// One decoded image sample from the camera, prior to JPEG encoding.
pub type Frame = RgbImage;

/// A live capture handle.
///
/// Implementations perform one blocking read per call; dropping the value
/// releases the underlying device. All handle lifecycle decisions (open,
/// reset, reopen) belong to [`CameraSession`], never to callers.
pub trait CaptureDevice: Send {
    /// Read and decode one frame from the device.
    fn read_frame(&mut self) -> Result<Frame>;
}

/// Fallible factory for capture handles.
///
/// The session holds exactly one opener and goes through it for every
/// `Closed -> Open` transition, so tests can substitute a scripted backend.
pub trait CaptureOpener: Send + Sync {
    /// Open the underlying device.
    fn open(&self) -> Result<Box<dyn CaptureDevice>>;
}
