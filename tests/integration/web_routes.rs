//! HTTP route behavior over a mock camera.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use regex::Regex;
use tower::util::ServiceExt;

use sentrycam::camera::mock::MockOpener;
use sentrycam::trigger::TriggerKind;
use sentrycam::web::router;

use crate::common::test_state;

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn index_renders() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("sentrycam"));
    assert!(body.contains("No snapshots yet"));
}

#[tokio::test]
async fn snapshot_redirects_to_preview_and_persists() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state.clone()).oneshot(get("/snapshot")).await.unwrap();
    assert!(response.status().is_redirection());

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    let pattern = Regex::new(r"^/preview/img_\d{8}_\d{6}\.jpg\?next=/$").unwrap();
    assert!(pattern.is_match(location), "unexpected location {location}");

    assert_eq!(state.store.list().unwrap().len(), 1);
}

#[tokio::test]
async fn live_snapshot_redirects_back_to_live() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state).oneshot(get("/live_snapshot")).await.unwrap();
    assert!(response.status().is_redirection());

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.ends_with("next=/live"), "got {location}");
}

#[tokio::test]
async fn snapshot_unavailable_returns_500() {
    let opener = MockOpener::new();
    opener.fail_next_opens(1);
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state.clone()).oneshot(get("/snapshot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(state.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn pictures_serves_stored_jpeg() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);
    let jpeg = crate::common::jpeg_fixture();
    let name = state.store.save(&jpeg).unwrap();

    let response = router(state)
        .oneshot(get(&format!("/pictures/{name}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );

    let bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), jpeg.as_slice());
}

#[tokio::test]
async fn pictures_missing_is_404() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state)
        .oneshot(get("/pictures/img_19990101_000000.jpg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pictures_traversal_is_404() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state)
        .oneshot(get("/pictures/..%2F..%2Fetc%2Fpasswd"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_file_and_redirects_to_referer() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);
    let name = state.store.save(&crate::common::jpeg_fixture()).unwrap();

    let request = Request::builder()
        .method("POST")
        .uri(format!("/delete/{name}"))
        .header(header::REFERER, "/gallery")
        .body(Body::empty())
        .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/gallery"
    );
    assert!(state.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_redirects_home() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state)
        .oneshot(post("/delete/img_19990101_000000.jpg"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn preview_renders_filename() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state)
        .oneshot(get("/preview/img_20240101_000100.jpg?next=/live"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("img_20240101_000100.jpg"));
    assert!(body.contains("href=\"/live\""));
}

#[tokio::test]
async fn video_feed_has_multipart_content_type() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state).oneshot(get("/video_feed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "multipart/x-mixed-replace; boundary=frame"
    );
}

#[tokio::test]
async fn api_gallery_lists_newest_first() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);
    let jpeg = crate::common::jpeg_fixture();

    use chrono::TimeZone;
    let older = chrono::Local.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap();
    let newer = chrono::Local.with_ymd_and_hms(2024, 1, 1, 0, 2, 0).unwrap();
    state.store.save_at(&jpeg, older).unwrap();
    state.store.save_at(&jpeg, newer).unwrap();

    let response = router(state).oneshot(get("/api/gallery")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body["images"],
        serde_json::json!(["img_20240101_000200.jpg", "img_20240101_000100.jpg"])
    );
}

#[tokio::test]
async fn api_status_reports_counts() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state).oneshot(get("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["snapshots"], 0);
    assert!(body["uptime_secs"].is_u64());
    assert_eq!(body["camera_open"], false);
}

#[tokio::test]
async fn api_trigger_queues_known_sources() {
    let opener = MockOpener::new();
    let (_dir, state, mut rx) = test_state(&opener);

    let response = router(state)
        .oneshot(post("/api/trigger/button"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(rx.try_recv().unwrap(), TriggerKind::Button);
}

#[tokio::test]
async fn api_trigger_unknown_source_is_404() {
    let opener = MockOpener::new();
    let (_dir, state, _rx) = test_state(&opener);

    let response = router(state)
        .oneshot(post("/api/trigger/doorbell"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
