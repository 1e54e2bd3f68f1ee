//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! flags / environment
//!     → schema.rs (Settings, parsed by clap)
//!     → loader.rs (validate endpoints, GET app config with backoff)
//!     → Config (immutable, held for process lifetime)
//! ```
//!
//! # Design Decisions
//! - Missing endpoints are configuration errors and never retried
//! - The remote fetch retries with doubling backoff for at most an hour
//! - Config is passed explicitly to each component, no globals

pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{Config, RemoteConfig, Settings};
