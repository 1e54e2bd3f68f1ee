//! Shared utilities for integration testing.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use audio_player::config::Settings;

/// A fake blob store: app config, master query registration and search.
#[derive(Default)]
pub struct MockStore {
    pub ack: Mutex<String>,
    pub results: Mutex<Value>,
    pub fail_queries: AtomicBool,
    pub query_hits: AtomicUsize,
    pub registered: Mutex<Option<Value>>,
}

impl MockStore {
    pub fn set_songs(&self, songs: &[(&str, &str, &str, &str)]) {
        *self.results.lock().unwrap() = search_result(songs);
    }
}

/// Start the mock blob store on an ephemeral port.
pub async fn start_mock_store(ack: &str) -> (SocketAddr, Arc<MockStore>) {
    let store = Arc::new(MockStore::default());
    *store.ack.lock().unwrap() = ack.to_string();
    *store.results.lock().unwrap() = search_result(&[]);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route(
            "/config",
            get(move || async move {
                Json(json!({"searchRoot": format!("http://{}/my-search/", addr)}))
            }),
        )
        .route("/masterquery", post(register))
        .route("/my-search/camli/search/query", post(query))
        .with_state(store.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, store)
}

async fn register(State(store): State<Arc<MockStore>>, body: Bytes) -> String {
    *store.registered.lock().unwrap() = serde_json::from_slice(&body).ok();
    store.ack.lock().unwrap().clone()
}

async fn query(State(store): State<Arc<MockStore>>) -> impl IntoResponse {
    store.query_hits.fetch_add(1, Ordering::SeqCst);
    if store.fail_queries.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "index unavailable").into_response();
    }
    Json(store.results.lock().unwrap().clone()).into_response()
}

/// Settings pointing at the mock store.
pub fn settings_for(addr: SocketAddr) -> Settings {
    Settings {
        config_url: Some(format!("http://{}/config", addr)),
        masterquery_url: Some(format!("http://{}/masterquery", addr)),
        listen: Some("127.0.0.1:0".to_string()),
        ..Settings::default()
    }
}

/// Sequential valid sha1 refs.
pub fn blob_ref(n: usize) -> String {
    format!("sha1-{:040x}", n)
}

/// Search result for `(title, album, artist, genre)` tuples; empty strings are omitted tags.
pub fn search_result(songs: &[(&str, &str, &str, &str)]) -> Value {
    let mut blobs = Vec::new();
    let mut meta = serde_json::Map::new();
    for (i, (title, album, artist, genre)) in songs.iter().enumerate() {
        let blob = blob_ref(i + 1);
        let mut tags = serde_json::Map::new();
        for (key, value) in [("title", title), ("album", album), ("artist", artist), ("genre", genre)] {
            if !value.is_empty() {
                tags.insert(key.to_string(), json!(value));
            }
        }
        blobs.push(json!({"blob": blob}));
        meta.insert(
            blob.clone(),
            json!({
                "blobRef": blob,
                "camliType": "file",
                "file": {"fileName": format!("{}.mp3", i), "mimeType": "audio/mpeg"},
                "mediaTags": tags
            }),
        );
    }
    json!({"blobs": blobs, "description": {"meta": meta}})
}
