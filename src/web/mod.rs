//! Web server module: axum HTTP routes for the surveillance UI.
//!
//! Routes:
//! - `GET /` - index page with capture controls and recent snapshots
//! - `GET /gallery` - full snapshot gallery
//! - `GET /live` - live view page
//! - `GET /preview/{filename}` - single-snapshot preview
//! - `GET /snapshot`, `GET /live_snapshot` - capture and redirect to preview
//! - `GET /video_feed` - MJPEG stream
//! - `GET /pictures/{filename}` - stored JPEG bytes
//! - `POST /delete/{filename}` - delete, then redirect back
//! - `GET /api/gallery`, `GET /api/status` - JSON for scripts
//! - `POST /api/trigger/{source}` - inject a hardware trigger event

pub mod pages;
pub mod stream;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::camera::CameraSession;
use crate::error::{CamError, Result};
use crate::storage::SnapshotStore;
use crate::trigger::TriggerKind;

/// Shared state for the web server.
pub struct AppState {
    pub session: Arc<CameraSession>,
    pub store: SnapshotStore,
    pub triggers: mpsc::Sender<TriggerKind>,
    pub started: Instant,
}

type SharedState = Arc<AppState>;

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/gallery", get(gallery_page))
        .route("/live", get(live_page))
        .route("/preview/{filename}", get(preview_page))
        .route("/snapshot", get(take_snapshot))
        .route("/live_snapshot", get(take_live_snapshot))
        .route("/video_feed", get(video_feed))
        .route("/pictures/{filename}", get(serve_picture))
        .route("/delete/{filename}", post(delete_picture))
        .route("/api/gallery", get(api_gallery))
        .route("/api/status", get(api_status))
        .route("/api/trigger/{source}", post(api_trigger))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(state: SharedState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CamError::WebServerFailed {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| CamError::WebServerFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        })
}

// === Pages ===

async fn index_page(State(state): State<SharedState>) -> Response {
    match state.store.list() {
        Ok(images) => pages::index(&images).into_response(),
        Err(err) => storage_error(&err),
    }
}

async fn gallery_page(State(state): State<SharedState>) -> Response {
    match state.store.list() {
        Ok(images) => pages::gallery(&images).into_response(),
        Err(err) => storage_error(&err),
    }
}

async fn live_page() -> Html<String> {
    pages::live()
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    next: Option<String>,
}

async fn preview_page(
    Path(filename): Path<String>,
    Query(params): Query<PreviewParams>,
) -> Html<String> {
    let next = params.next.as_deref().unwrap_or("/");
    pages::preview(&filename, next)
}

// === Capture ===

async fn take_snapshot(State(state): State<SharedState>) -> Response {
    snapshot_redirect(&state, "/").await
}

async fn take_live_snapshot(State(state): State<SharedState>) -> Response {
    snapshot_redirect(&state, "/live").await
}

/// Take a snapshot and redirect to its preview, or 500 when the camera is
/// unavailable.
async fn snapshot_redirect(state: &AppState, next: &str) -> Response {
    let session = Arc::clone(&state.session);
    let store = state.store.clone();

    match tokio::task::spawn_blocking(move || session.save_snapshot(&store)).await {
        Ok(Ok(name)) => Redirect::to(&format!("/preview/{name}?next={next}")).into_response(),
        Ok(Err(err)) => {
            warn!(error = %err, "Snapshot request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Camera unavailable").into_response()
        }
        Err(err) => {
            error!(error = %err, "Snapshot task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Camera unavailable").into_response()
        }
    }
}

async fn video_feed(State(state): State<SharedState>) -> Response {
    let frame_delay = state.session.options().frame_delay;
    let body = Body::from_stream(stream::mjpeg_stream(Arc::clone(&state.session), frame_delay));

    (
        [
            (header::CONTENT_TYPE, stream::MIME_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}

// === Stored snapshots ===

async fn serve_picture(State(state): State<SharedState>, Path(filename): Path<String>) -> Response {
    match state.store.read(&filename) {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(CamError::SnapshotNotFound { .. } | CamError::InvalidSnapshotName { .. }) => {
            (StatusCode::NOT_FOUND, "Snapshot not found").into_response()
        }
        Err(err) => storage_error(&err),
    }
}

async fn delete_picture(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(err) = state.store.delete(&filename) {
        return storage_error(&err);
    }

    let target = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/");
    Redirect::to(target).into_response()
}

// === JSON API ===

async fn api_gallery(State(state): State<SharedState>) -> Response {
    match state.store.list() {
        Ok(images) => Json(serde_json::json!({ "images": images })).into_response(),
        Err(err) => storage_error(&err),
    }
}

async fn api_status(State(state): State<SharedState>) -> Response {
    let snapshots = state.store.count().unwrap_or(0);
    Json(serde_json::json!({
        "uptime_secs": state.started.elapsed().as_secs(),
        "snapshots": snapshots,
        "storage_dir": state.store.dir().display().to_string(),
        "camera_open": state.session.is_open(),
    }))
    .into_response()
}

/// Queue a trigger event as if a hardware source fired.
async fn api_trigger(State(state): State<SharedState>, Path(source): Path<String>) -> Response {
    let Some(kind) = TriggerKind::from_label(&source) else {
        return (StatusCode::NOT_FOUND, "Unknown trigger source").into_response();
    };

    match state.triggers.try_send(kind) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "queued": kind.label() })),
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Trigger queue full or closed");
            (StatusCode::SERVICE_UNAVAILABLE, "Trigger queue unavailable").into_response()
        }
    }
}

fn storage_error(err: &CamError) -> Response {
    error!(error = %err, "Storage operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Storage error").into_response()
}
