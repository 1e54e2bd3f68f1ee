//! HTTP server setup.
//!
//! # Responsibilities
//! - Serve the current cache snapshot on `/api/meta`
//! - Serve the player UI for every other path, bundled or from an override directory
//! - Wire up middleware (request ID, tracing)
//! - Drain on the shutdown signal

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cache::MetaSource;
use crate::http::assets;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::observability::metrics;

pub const META_PATH: &str = "/api/meta";
/// Same endpoint under the prefix the UI is mounted at.
pub const PLAYER_META_PATH: &str = "/player/api/meta";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MetaSource>,
}

/// HTTP server for the player.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server reading from `source`.
    ///
    /// Static files come from the bundled player UI unless `assets_dir` is given.
    pub fn new(source: Arc<dyn MetaSource>, assets_dir: Option<&Path>) -> Self {
        let state = AppState { source };
        let router = Self::build_router(state, assets_dir);
        Self { router }
    }

    fn build_router(state: AppState, assets_dir: Option<&Path>) -> Router {
        let router: Router<AppState> = Router::new()
            .route(META_PATH, get(meta_handler))
            .route(PLAYER_META_PATH, get(meta_handler));

        let router = match assets_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "Serving static files from directory");
                router.fallback_service(ServeDir::new(dir))
            }
            None => router.fallback(assets::bundled),
        };

        router
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serialize whatever the cache holds right now. Never refreshes.
async fn meta_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.source.snapshot();
    metrics::record_meta_request(snapshot.records.len());

    match serde_json::to_vec(&snapshot.records) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode audio metadata");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
