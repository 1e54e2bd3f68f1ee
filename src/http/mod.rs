//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign request ID, open trace span)
//!     → server.rs
//!         /api/meta, /player/api/meta → current cache snapshot as JSON
//!         anything else               → assets.rs bundled file (or --assets dir), else 404
//! ```

pub mod assets;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, META_PATH};
