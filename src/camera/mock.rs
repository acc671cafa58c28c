//! Mock capture backend for unit testing.
//!
//! Provides a scripted camera that succeeds or fails on demand and counts
//! open/release transitions, so the session's recovery policy can be
//! exercised without hardware.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentrycam::camera::mock::MockOpener;
//!
//! let opener = MockOpener::new();
//! opener.queue_read_failures(3);
//! // first three reads fail, subsequent reads return synthetic frames
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::RgbImage;
use tracing::trace;

use super::{CaptureDevice, CaptureOpener, Frame};
use crate::error::{CamError, Result};

/// Outcome of one scripted read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadOutcome {
    Frame,
    Failure,
}

/// Shared script and counters behind a mock opener and its handles.
#[derive(Debug)]
struct MockPlan {
    reads: Mutex<VecDeque<ReadOutcome>>,
    open_failures: Mutex<u32>,
    open_attempts: AtomicUsize,
    opens: AtomicUsize,
    releases: AtomicUsize,
    frames_read: AtomicUsize,
    frame_width: u32,
    frame_height: u32,
}

/// Scripted capture opener.
///
/// Reads pop outcomes off a queue; an empty queue means success with a
/// synthetic frame, so an unscripted mock behaves like a healthy camera.
#[derive(Clone)]
pub struct MockOpener {
    plan: Arc<MockPlan>,
}

impl Default for MockOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOpener {
    /// Create a healthy mock with 64x48 synthetic frames.
    #[must_use]
    pub fn new() -> Self {
        Self::with_frame_size(64, 48)
    }

    /// Create a mock producing frames of the given size.
    #[must_use]
    pub fn with_frame_size(width: u32, height: u32) -> Self {
        Self {
            plan: Arc::new(MockPlan {
                reads: Mutex::new(VecDeque::new()),
                open_failures: Mutex::new(0),
                open_attempts: AtomicUsize::new(0),
                opens: AtomicUsize::new(0),
                releases: AtomicUsize::new(0),
                frames_read: AtomicUsize::new(0),
                frame_width: width,
                frame_height: height,
            }),
        }
    }

    // === Scripting ===

    /// Queue `n` consecutive read failures.
    pub fn queue_read_failures(&self, n: usize) {
        let mut reads = self.plan.reads.lock().unwrap();
        reads.extend(std::iter::repeat_n(ReadOutcome::Failure, n));
    }

    /// Queue `n` successful reads (only needed to interleave with failures).
    pub fn queue_frames(&self, n: usize) {
        let mut reads = self.plan.reads.lock().unwrap();
        reads.extend(std::iter::repeat_n(ReadOutcome::Frame, n));
    }

    /// Make the next `n` open attempts fail.
    pub fn fail_next_opens(&self, n: u32) {
        *self.plan.open_failures.lock().unwrap() = n;
    }

    // === Counters ===

    /// Number of open attempts (successful or not).
    #[must_use]
    pub fn open_attempts(&self) -> usize {
        self.plan.open_attempts.load(Ordering::SeqCst)
    }

    /// Number of successful opens.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.plan.opens.load(Ordering::SeqCst)
    }

    /// Number of handles released (dropped).
    #[must_use]
    pub fn releases(&self) -> usize {
        self.plan.releases.load(Ordering::SeqCst)
    }

    /// Number of frames successfully read across all handles.
    #[must_use]
    pub fn frames_read(&self) -> usize {
        self.plan.frames_read.load(Ordering::SeqCst)
    }
}

impl CaptureOpener for MockOpener {
    fn open(&self) -> Result<Box<dyn CaptureDevice>> {
        self.plan.open_attempts.fetch_add(1, Ordering::SeqCst);

        {
            let mut failures = self.plan.open_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(CamError::DeviceOpenFailed {
                    index: 0,
                    reason: "mock open failure".to_string(),
                });
            }
        }

        self.plan.opens.fetch_add(1, Ordering::SeqCst);
        trace!("Mock camera opened");
        Ok(Box::new(MockCapture {
            plan: Arc::clone(&self.plan),
        }))
    }
}

/// Scripted capture handle.
struct MockCapture {
    plan: Arc<MockPlan>,
}

impl MockCapture {
    fn synthetic_frame(&self) -> Frame {
        let mut img = RgbImage::new(self.plan.frame_width, self.plan.frame_height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([(x % 256) as u8, (y % 256) as u8, 64]);
        }
        img
    }
}

impl CaptureDevice for MockCapture {
    fn read_frame(&mut self) -> Result<Frame> {
        let outcome = self
            .plan
            .reads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ReadOutcome::Frame);

        match outcome {
            ReadOutcome::Frame => {
                self.plan.frames_read.fetch_add(1, Ordering::SeqCst);
                Ok(self.synthetic_frame())
            }
            ReadOutcome::Failure => Err(CamError::ReadFailed("mock read failure".to_string())),
        }
    }
}

impl Drop for MockCapture {
    fn drop(&mut self) {
        self.plan.releases.fetch_add(1, Ordering::SeqCst);
        trace!("Mock camera released");
    }
}
