//! The player UI, compiled into the binary.

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};

/// One file of the bundled tree.
#[derive(Debug)]
pub struct BundledFile {
    /// Path relative to the site root, without a leading `/`.
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: &'static [u8],
}

static PLAYER: &[BundledFile] = &[
    BundledFile {
        path: "player/index.html",
        content_type: "text/html; charset=utf-8",
        body: include_bytes!("../../assets/player/index.html"),
    },
    BundledFile {
        path: "player/css/player.css",
        content_type: "text/css; charset=utf-8",
        body: include_bytes!("../../assets/player/css/player.css"),
    },
    BundledFile {
        path: "player/js/player.js",
        content_type: "text/javascript; charset=utf-8",
        body: include_bytes!("../../assets/player/js/player.js"),
    },
];

/// Find the bundled file for a request path. Directory paths map to their `index.html`.
pub fn lookup(path: &str) -> Option<&'static BundledFile> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.ends_with('/') {
        let index = format!("{}index.html", path);
        return PLAYER.iter().find(|f| f.path == index);
    }
    PLAYER.iter().find(|f| f.path == path)
}

/// Fallback handler serving the bundled tree.
pub async fn bundled(uri: Uri) -> Response {
    let path = uri.path();
    if let Some(file) = lookup(path) {
        return ([(header::CONTENT_TYPE, file.content_type)], file.body).into_response();
    }

    // `/player` → `/player/` so relative links in the page resolve
    let dir = format!("{}/", path.trim_end_matches('/'));
    if !path.ends_with('/') && lookup(&dir).is_some() {
        return Redirect::permanent(&dir).into_response();
    }

    StatusCode::NOT_FOUND.into_response()
}
