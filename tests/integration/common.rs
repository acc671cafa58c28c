//! Common test utilities.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use tempfile::TempDir;
use tokio::sync::mpsc;

use sentrycam::camera::mock::MockOpener;
use sentrycam::camera::CameraSession;
use sentrycam::storage::SnapshotStore;
use sentrycam::trigger::TriggerKind;
use sentrycam::web::AppState;

/// A snapshot store rooted in a fresh temporary directory.
pub fn temp_store() -> (TempDir, SnapshotStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SnapshotStore::open(dir.path()).expect("open store");
    (dir, store)
}

/// A camera session backed by the given mock opener.
pub fn mock_session(opener: &MockOpener) -> Arc<CameraSession> {
    Arc::new(CameraSession::new(Box::new(opener.clone())))
}

/// Encoded JPEG bytes for a small synthetic frame.
pub fn jpeg_fixture() -> Vec<u8> {
    let mut img = image::RgbImage::new(32, 24);
    for (x, _, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgb([(x * 8 % 256) as u8, 100, 200]);
    }
    sentrycam::image_ops::encode_jpeg(&img).expect("encode fixture")
}

/// Full web application state over a mock camera and temp storage.
///
/// The trigger receiver is returned so tests can observe queued events;
/// dropping it closes the channel and makes `/api/trigger` return 503.
pub fn test_state(
    opener: &MockOpener,
) -> (TempDir, Arc<AppState>, mpsc::Receiver<TriggerKind>) {
    let (dir, store) = temp_store();
    let (tx, rx) = mpsc::channel(4);
    let state = Arc::new(AppState {
        session: mock_session(opener),
        store,
        triggers: tx,
        started: Instant::now(),
    });
    (dir, state, rx)
}
