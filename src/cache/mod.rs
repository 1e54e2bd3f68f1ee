//! Audio metadata cache subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     register() → initial_refresh() (failure is fatal)
//!
//! Every interval (refresh.rs):
//!     search backend query
//!     → record.rs (drop blobs missing title/album/artist or with a bad ref)
//!     → publish new Snapshot (atomic pointer swap)
//!
//! Each /api/meta request:
//!     snapshot() → serialize records
//! ```
//!
//! # Design Decisions
//! - Full re-fetch on every refresh, no deltas
//! - A failed periodic refresh keeps the previous snapshot
//! - Readers never wait on the network

pub mod record;
pub mod refresh;

pub use record::AudioRecord;
pub use refresh::{CacheError, MetaSource, RefreshCache, RefreshStats, Snapshot};
