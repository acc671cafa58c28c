//! Camera session recovery behavior across the public API.

use regex::Regex;

use sentrycam::camera::mock::MockOpener;
use sentrycam::camera::{CameraSession, SessionOptions, DEFAULT_RECOVERY_THRESHOLD};

use crate::common::{mock_session, temp_store};

#[test]
fn default_threshold_matches_original_policy() {
    assert_eq!(DEFAULT_RECOVERY_THRESHOLD, 10);
}

#[test]
fn full_failure_recovery_cycle() {
    let opener = MockOpener::new();
    let session = mock_session(&opener);

    // Healthy read opens the device.
    session.acquire_frame().unwrap();
    assert_eq!(opener.opens(), 1);

    // Nine failures: still open, handle kept.
    opener.queue_read_failures(9);
    for _ in 0..9 {
        assert!(session.acquire_frame().is_err());
    }
    assert!(session.is_open());
    assert_eq!(opener.releases(), 0);

    // Tenth failure: handle released, counter reset.
    opener.queue_read_failures(1);
    assert!(session.acquire_frame().is_err());
    assert!(!session.is_open());
    assert_eq!(session.failure_count(), 0);
    assert_eq!(opener.releases(), 1);

    // Next request transparently reopens.
    session.acquire_frame().unwrap();
    assert_eq!(opener.opens(), 2);
}

#[test]
fn interleaved_successes_never_trigger_recovery() {
    let opener = MockOpener::new();
    let session = mock_session(&opener);

    // Alternate failure batches with single successes; the counter never
    // reaches the threshold so the handle is never recycled.
    for _ in 0..5 {
        opener.queue_read_failures(9);
        opener.queue_frames(1);
        for _ in 0..9 {
            assert!(session.acquire_frame().is_err());
        }
        session.acquire_frame().unwrap();
        assert_eq!(session.failure_count(), 0);
    }

    assert_eq!(opener.releases(), 0);
    assert_eq!(opener.opens(), 1);
}

#[test]
fn snapshot_filename_matches_timestamp_pattern() {
    let opener = MockOpener::new();
    let session = mock_session(&opener);
    let (_dir, store) = temp_store();

    let name = session.save_snapshot(&store).unwrap();
    let pattern = Regex::new(r"^img_\d{8}_\d{6}\.jpg$").unwrap();
    assert!(pattern.is_match(&name), "unexpected name: {name}");
}

#[test]
fn snapshot_content_round_trips_dimensions() {
    let opener = MockOpener::with_frame_size(160, 120);
    let session = mock_session(&opener);
    let (_dir, store) = temp_store();

    let name = session.save_snapshot(&store).unwrap();
    let decoded = image::load_from_memory(&store.read(&name).unwrap()).unwrap();
    assert_eq!(image::GenericImageView::dimensions(&decoded), (160, 120));
}

#[test]
fn unavailable_snapshot_leaves_storage_untouched() {
    let opener = MockOpener::new();
    opener.fail_next_opens(1);
    let session = mock_session(&opener);
    let (_dir, store) = temp_store();

    assert!(session.save_snapshot(&store).is_err());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn configured_threshold_overrides_default() {
    let opener = MockOpener::new();
    let session = CameraSession::with_options(
        Box::new(opener.clone()),
        SessionOptions {
            recovery_threshold: 2,
            ..SessionOptions::default()
        },
    );

    session.acquire_frame().unwrap();
    opener.queue_read_failures(2);
    assert!(session.acquire_frame().is_err());
    assert!(session.is_open());
    assert!(session.acquire_frame().is_err());
    assert!(!session.is_open());
}
