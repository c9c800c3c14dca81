//! Cinepipe TMDB - popular-movies catalog pipeline
//!
//! Pages through the TMDB "popular movies" listing, fetches detail and
//! credits for every movie, flattens them into [`MovieRecord`]s and keeps
//! the result set and a page checkpoint on disk so an interrupted job can
//! pick up where it stopped.
//!
//! # Example
//!
//! ```ignore
//! use cinepipe_core::ProgressContext;
//! use cinepipe_tmdb::{Config, run};
//!
//! let config = Config {
//!     api_key: std::env::var("TMDB_API_KEY")?,
//!     max_pages: 2,
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &ProgressContext::hidden())?;
//! println!("{} movies", summary.total_records);
//! ```

pub mod api;
pub mod checkpoint;
pub mod config;
pub mod runner;
pub mod stats;
pub mod store;
pub mod transform;

// Re-exports
pub use api::{MovieSource, TmdbClient};
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use config::Config;
pub use runner::{run, run_with_source};
pub use stats::Summary;
pub use store::ResultStore;
pub use transform::{MovieRecord, transform};
