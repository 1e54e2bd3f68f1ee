//! Blob store search subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     registrar.rs (POST standing query, expect literal "OK")
//!
//! Every refresh:
//!     client.rs (POST query to {searchRoot}camli/search/query)
//!     → types.rs (decode matched blobs + descriptions)
//!     → handed to the refresh cache for filtering
//! ```
//!
//! # Design Decisions
//! - `SearchBackend` is the seam the cache depends on; tests swap in fakes
//! - Auth is a plain value applied per request, not a global client setting
//! - Registration is never retried; a rejection is a misconfiguration

pub mod auth;
pub mod client;
pub mod registrar;
pub mod types;

pub use auth::{AuthError, AuthMode};
pub use client::{HttpSearchBackend, SearchBackend, SearchError};
pub use registrar::{QueryRegistrar, RegistrationError};
pub use types::{BlobRef, DescribedBlob, SearchQuery, SearchResult};
