//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → ConfigLoader → register query → initial refresh
//!     → spawn refresh loop → bind listener → serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl+C → broadcast → HTTP server drains, refresh loop exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when the cache is populated)

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start_cache, Service, StartupError};
