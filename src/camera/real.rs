//! Real camera implementation backed by the `nokhwa` crate.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{debug, info};

use super::{CaptureDevice, CaptureOpener, Frame};
use crate::error::{CamError, Result};

/// Opener for a local camera at a fixed logical index.
pub struct NokhwaOpener {
    index: u32,
}

impl NokhwaOpener {
    /// Create an opener for the camera at `index` (0 is the first device).
    #[must_use]
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

impl CaptureOpener for NokhwaOpener {
    fn open(&self) -> Result<Box<dyn CaptureDevice>> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut inner = Camera::new(CameraIndex::Index(self.index), requested).map_err(|e| {
            CamError::DeviceOpenFailed {
                index: self.index,
                reason: e.to_string(),
            }
        })?;

        inner.open_stream().map_err(|e| CamError::DeviceOpenFailed {
            index: self.index,
            reason: e.to_string(),
        })?;

        info!(
            index = self.index,
            format = ?inner.camera_format(),
            "Camera opened"
        );

        Ok(Box::new(NokhwaCapture { inner }))
    }
}

/// Live `nokhwa` capture handle.
struct NokhwaCapture {
    inner: Camera,
}

impl CaptureDevice for NokhwaCapture {
    fn read_frame(&mut self) -> Result<Frame> {
        let buffer = self
            .inner
            .frame()
            .map_err(|e| CamError::ReadFailed(e.to_string()))?;

        let frame = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CamError::ReadFailed(e.to_string()))?;

        Ok(frame)
    }
}

impl Drop for NokhwaCapture {
    fn drop(&mut self) {
        if let Err(e) = self.inner.stop_stream() {
            debug!(error = %e, "Ignoring error while stopping camera stream");
        }
    }
}
