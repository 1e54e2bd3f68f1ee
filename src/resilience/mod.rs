//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup config fetch:
//!     → backoff.rs (retry with doubling delay until the deadline)
//!     → deadline exceeded escalates to a fatal startup error
//! ```
//!
//! # Design Decisions
//! - Only the startup config fetch retries; everything else fails once
//! - A single attempt never outlives the deadline
//! - Delays double without jitter so the schedule is predictable
//! - Time comes from tokio so tests can run on a paused clock

pub mod backoff;

pub use backoff::{retry_until_deadline, AttemptError, BackoffPolicy, DeadlineExceeded};
