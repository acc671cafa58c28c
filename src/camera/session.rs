//! Shared camera session: single owner of the capture handle.
//!
//! All frame reads, whether for the live stream, an HTTP snapshot, or a
//! hardware trigger, go through one process-wide [`CameraSession`]. The
//! session opens the device lazily, counts consecutive read failures, and
//! after [`SessionOptions::recovery_threshold`] failures releases the handle
//! so the next request reopens it. Callers never touch the device directly.

use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CaptureDevice, CaptureOpener, Frame};
use crate::error::Result;
use crate::image_ops;
use crate::storage::SnapshotStore;

/// Consecutive read failures tolerated before the handle is recycled.
pub const DEFAULT_RECOVERY_THRESHOLD: u32 = 10;

/// Delay between stream frames, throttling the stream to ~25 fps.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(40);

/// Tunables for the session's recovery and streaming behavior.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Consecutive read failures before the handle is released and reopened.
    pub recovery_threshold: u32,
    /// Fixed delay between stream frames.
    pub frame_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            recovery_threshold: DEFAULT_RECOVERY_THRESHOLD,
            frame_delay: DEFAULT_FRAME_DELAY,
        }
    }
}

struct Inner {
    device: Option<Box<dyn CaptureDevice>>,
    consecutive_failures: u32,
}

/// Sole owner and mediator of the hardware capture handle.
pub struct CameraSession {
    opener: Box<dyn CaptureOpener>,
    options: SessionOptions,
    inner: Mutex<Inner>,
}

impl CameraSession {
    /// Create a session with default options. No device is opened until the
    /// first frame request.
    pub fn new(opener: Box<dyn CaptureOpener>) -> Self {
        Self::with_options(opener, SessionOptions::default())
    }

    /// Create a session with explicit options.
    pub fn with_options(opener: Box<dyn CaptureOpener>, options: SessionOptions) -> Self {
        Self {
            opener,
            options,
            inner: Mutex::new(Inner {
                device: None,
                consecutive_failures: 0,
            }),
        }
    }

    /// The session's tunables.
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Whether a device handle is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lock().expect("camera session lock poisoned").device.is_some()
    }

    /// Current consecutive-failure count.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.inner
            .lock()
            .expect("camera session lock poisoned")
            .consecutive_failures
    }

    /// Acquire one decoded frame, opening the device if needed.
    ///
    /// On a read failure the consecutive-failure counter is bumped; once it
    /// reaches the recovery threshold the handle is released so the next
    /// call starts from a fresh open. Any success resets the counter.
    ///
    /// The internal lock is held only for this read-and-recover step, never
    /// across stream throttling pauses. The read blocks on the device, so
    /// async callers should wrap this in `spawn_blocking`.
    pub fn acquire_frame(&self) -> Result<Frame> {
        let mut inner = self.inner.lock().expect("camera session lock poisoned");

        if inner.device.is_none() {
            match self.opener.open() {
                Ok(device) => {
                    debug!("Camera session opened device");
                    inner.device = Some(device);
                }
                Err(err) => {
                    warn!(error = %err, "Camera open failed");
                    return Err(err);
                }
            }
        }

        let device = inner.device.as_mut().expect("device present after open");
        match device.read_frame() {
            Ok(frame) => {
                inner.consecutive_failures = 0;
                Ok(frame)
            }
            Err(err) => {
                inner.consecutive_failures += 1;
                warn!(
                    failures = inner.consecutive_failures,
                    error = %err,
                    "Camera read failed"
                );
                if inner.consecutive_failures >= self.options.recovery_threshold {
                    warn!("Restarting camera after repeated read failures");
                    inner.device = None;
                    inner.consecutive_failures = 0;
                }
                Err(err)
            }
        }
    }

    /// Acquire one frame and return it as encoded JPEG bytes.
    ///
    /// Encoding happens outside the session lock; an encode failure does not
    /// feed the recovery counter.
    pub fn next_jpeg(&self) -> Result<Vec<u8>> {
        let frame = self.acquire_frame()?;
        image_ops::encode_jpeg(&frame)
    }

    /// Take a snapshot: acquire a frame, encode it, persist it to `store`,
    /// and return the stored filename. On any capture or encode failure no
    /// file is created.
    pub fn save_snapshot(&self, store: &SnapshotStore) -> Result<String> {
        let jpeg = self.next_jpeg()?;
        store.save(&jpeg)
    }
}
