//! Server-rendered HTML pages.
//!
//! The UI is deliberately small: an index with the newest snapshots, a full
//! gallery, a live view, and a per-image preview. Pages are plain HTML
//! strings; there is no client-side framework.

use axum::response::Html;

/// Minimal HTML attribute/text escaping for untrusted filename input.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Restrict the post-action return target to known pages.
#[must_use]
pub fn sanitize_next(next: &str) -> &'static str {
    match next {
        "/live" => "/live",
        "/gallery" => "/gallery",
        _ => "/",
    }
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} - sentrycam</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 1.5rem; background: #111; color: #eee; }}\n\
         a {{ color: #7cb2ff; }}\n\
         nav a {{ margin-right: 1rem; }}\n\
         .grid {{ display: flex; flex-wrap: wrap; gap: 1rem; }}\n\
         .card {{ background: #1c1c1c; padding: .5rem; border-radius: 6px; }}\n\
         .card img {{ max-width: 240px; display: block; }}\n\
         button {{ cursor: pointer; }}\n\
         </style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a><a href=\"/gallery\">Gallery</a>\
         <a href=\"/live\">Live</a></nav>\n{body}\n</body>\n</html>\n"
    ))
}

fn image_card(name: &str, next: &str) -> String {
    let name = escape(name);
    format!(
        "<div class=\"card\">\n\
         <a href=\"/preview/{name}?next={next}\"><img src=\"/pictures/{name}\" alt=\"{name}\"></a>\n\
         <p>{name}</p>\n\
         <form method=\"post\" action=\"/delete/{name}\"><button>Delete</button></form>\n\
         </div>"
    )
}

/// Index page: capture controls plus the stored snapshots, newest first.
#[must_use]
pub fn index(images: &[String]) -> Html<String> {
    let mut body = String::from(
        "<h1>sentrycam</h1>\n\
         <p><a href=\"/snapshot\"><button>Take snapshot</button></a>\n\
         <a href=\"/live\"><button>Live view</button></a></p>\n",
    );
    if images.is_empty() {
        body.push_str("<p>No snapshots yet.</p>\n");
    } else {
        body.push_str("<div class=\"grid\">\n");
        for name in images {
            body.push_str(&image_card(name, "/"));
            body.push('\n');
        }
        body.push_str("</div>\n");
    }
    page("Home", &body)
}

/// Gallery page: every stored snapshot.
#[must_use]
pub fn gallery(images: &[String]) -> Html<String> {
    let mut body = String::from("<h1>Gallery</h1>\n");
    if images.is_empty() {
        body.push_str("<p>No snapshots yet.</p>\n");
    } else {
        body.push_str("<div class=\"grid\">\n");
        for name in images {
            body.push_str(&image_card(name, "/gallery"));
            body.push('\n');
        }
        body.push_str("</div>\n");
    }
    page("Gallery", &body)
}

/// Live view page embedding the MJPEG stream.
#[must_use]
pub fn live() -> Html<String> {
    page(
        "Live",
        "<h1>Live view</h1>\n\
         <p><img src=\"/video_feed\" alt=\"live stream\" style=\"max-width: 100%\"></p>\n\
         <p><a href=\"/live_snapshot\"><button>Take snapshot</button></a></p>\n",
    )
}

/// Preview page for a single snapshot.
#[must_use]
pub fn preview(filename: &str, next: &str) -> Html<String> {
    let name = escape(filename);
    let next = sanitize_next(next);
    let body = format!(
        "<h1>{name}</h1>\n\
         <p><img src=\"/pictures/{name}\" alt=\"{name}\" style=\"max-width: 100%\"></p>\n\
         <p><a href=\"{next}\">Back</a></p>\n\
         <form method=\"post\" action=\"/delete/{name}\"><button>Delete</button></form>\n"
    );
    page(&name, &body)
}
