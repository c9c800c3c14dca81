//! TMDB job configuration

use std::path::PathBuf;
use std::time::Duration;

use cinepipe_core::{DEFAULT_TIMEOUT, RetryPolicy};

/// TMDB v3 API root
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Runtime configuration for one ETL run. Built once, never mutated.
#[derive(Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub api_key: String,
    /// API root, without trailing slash
    pub api_url: String,
    /// `language` query parameter
    pub language: String,
    /// Last page to fetch (inclusive)
    pub max_pages: u32,
    /// Total attempts per request
    pub retry_count: u32,
    /// Backoff base in seconds
    pub retry_delay: u64,
    /// Pause after each transformed movie
    pub sleep_time: Duration,
    /// Per-request timeout
    pub timeout: Duration,
    /// Result set JSON array
    pub output_file: PathBuf,
    /// `{"last_page": N}` marker
    pub checkpoint_file: PathBuf,
    /// Save checkpoint + results every N accumulated records
    pub checkpoint_frequency: usize,
    /// Append-only run log
    pub log_file: PathBuf,
    /// Failure count at which a failed page aborts the job
    pub fail_threshold: usize,
    /// Continue after the stored checkpoint when one exists
    pub resume: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            language: "en-US".to_string(),
            max_pages: 15,
            retry_count: 3,
            retry_delay: 2,
            sleep_time: Duration::from_millis(250),
            timeout: DEFAULT_TIMEOUT,
            output_file: PathBuf::from("popular_movies.json"),
            checkpoint_file: PathBuf::from("checkpoint.json"),
            checkpoint_frequency: 20,
            log_file: PathBuf::from("etl_log.txt"),
            fail_threshold: 10,
            resume: true,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("language", &self.language)
            .field("max_pages", &self.max_pages)
            .field("retry_count", &self.retry_count)
            .field("retry_delay", &self.retry_delay)
            .field("sleep_time", &self.sleep_time)
            .field("timeout", &self.timeout)
            .field("output_file", &self.output_file)
            .field("checkpoint_file", &self.checkpoint_file)
            .field("checkpoint_frequency", &self.checkpoint_frequency)
            .field("log_file", &self.log_file)
            .field("fail_threshold", &self.fail_threshold)
            .field("resume", &self.resume)
            .finish()
    }
}

impl Config {
    /// Reject settings the job cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.api_key.trim().is_empty(),
            "TMDB API key missing: set {API_KEY_ENV} or [tmdb].api_key"
        );
        anyhow::ensure!(self.max_pages >= 1, "max_pages must be at least 1");
        anyhow::ensure!(self.retry_count >= 1, "retry_count must be at least 1");
        anyhow::ensure!(
            self.checkpoint_frequency >= 1,
            "checkpoint_frequency must be at least 1"
        );
        anyhow::ensure!(self.fail_threshold >= 1, "fail_threshold must be at least 1");
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_count,
            delay_base: self.retry_delay,
        }
    }
}
