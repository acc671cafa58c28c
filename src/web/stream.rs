//! MJPEG streaming over multipart/x-mixed-replace.
//!
//! The stream is pull-driven: the consumer's pace plus a fixed delay
//! throttle production to roughly 25 frames per second regardless of the
//! camera's native rate. Capture failures pause and retry instead of ending
//! the stream, so a viewer rides out camera recovery transparently.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use axum::body::Bytes;
use futures::Stream;
use tracing::warn;

use crate::camera::CameraSession;
use crate::error::CamError;

/// Multipart boundary token between frames.
pub const BOUNDARY: &str = "frame";

/// Content type for the streaming response.
pub const MIME_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Pause before retrying after an unavailable frame.
const UNAVAILABLE_RETRY: Duration = Duration::from_millis(100);

/// Pause after a dropped (unencodable) frame.
const ENCODE_RETRY: Duration = Duration::from_millis(20);

/// Produce an unbounded sequence of multipart JPEG parts.
///
/// Device reads run on the blocking pool; the session lock is held only for
/// the read itself, never across the throttling sleeps, so snapshot and
/// trigger callers are not starved by a long-lived stream.
pub fn mjpeg_stream(
    session: Arc<CameraSession>,
    frame_delay: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    stream! {
        loop {
            let worker = Arc::clone(&session);
            match tokio::task::spawn_blocking(move || worker.next_jpeg()).await {
                Ok(Ok(jpeg)) => {
                    yield Ok(encode_part(&jpeg));
                    tokio::time::sleep(frame_delay).await;
                }
                Ok(Err(CamError::EncodeFailed(reason))) => {
                    // Drop the frame, keep the stream alive.
                    warn!(reason = %reason, "Skipping unencodable frame");
                    tokio::time::sleep(ENCODE_RETRY).await;
                }
                Ok(Err(_)) => {
                    // Unavailable: the session already logged and counted it.
                    tokio::time::sleep(UNAVAILABLE_RETRY).await;
                }
                Err(err) => {
                    warn!(error = %err, "Frame read task failed");
                    tokio::time::sleep(UNAVAILABLE_RETRY).await;
                }
            }
        }
    }
}

/// Frame one JPEG as a multipart part.
fn encode_part(jpeg: &[u8]) -> Bytes {
    let mut part = Vec::with_capacity(jpeg.len() + 64);
    part.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    Bytes::from(part)
}
