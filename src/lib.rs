//! Audio player backend.
//!
//! Serves the audio files known to a blob store's search service as a JSON
//! catalog, next to a static web player.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup                                    steady state
//!   ───────                                    ────────────
//!   config::ConfigLoader  (GET, backoff)       refresh loop ──every interval──┐
//!        │                                                                    ▼
//!        ▼                                          search backend ──query──▶ filter
//!   cache::RefreshCache::register                                              │
//!        │   (POST standing query, expect "OK")                                ▼
//!        ▼                                                          publish Snapshot
//!   cache::RefreshCache::initial_refresh                                       │
//!        │                                                                     ▼
//!        ▼                                  GET /api/meta ──▶ snapshot() ──▶ JSON
//!   spawn refresh loop, bind, serve         GET /anything  ──▶ static assets
//! ```

// Core subsystems
pub mod cache;
pub mod config;
pub mod http;
pub mod search;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use cache::{AudioRecord, RefreshCache, Snapshot};
pub use config::Settings;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
