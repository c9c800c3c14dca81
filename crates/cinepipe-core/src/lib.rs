//! Cinepipe Core - Common infrastructure for catalog ETL jobs
//!
//! This crate provides the reusable pieces of a paginated API pipeline:
//! a retrying blocking HTTP transport, the run log sink, progress
//! reporting, and crash-safe JSON file writes.

pub mod atomic;
pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod retry;

// Re-exports for convenience
pub use atomic::{read_json, write_json_atomic};
pub use error::FetchError;
pub use http::{DEFAULT_TIMEOUT, HttpTransport, Transport};
pub use logging::init_logging;
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::RetryPolicy;
