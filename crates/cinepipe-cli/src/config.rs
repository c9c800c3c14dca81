//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use cinepipe_tmdb::config::{API_KEY_ENV, DEFAULT_API_URL};

/// File-level configuration for cinepipe
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub etl: EtlConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: std::env::var(API_KEY_ENV).ok(),
            language: "en-US".to_string(),
        }
    }
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("language", &self.language)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub max_pages: u32,
    pub retry_count: u32,
    pub retry_delay: u64,
    pub sleep_ms: u64,
    pub timeout_secs: u64,
    pub checkpoint_frequency: usize,
    pub fail_threshold: usize,
    pub resume: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            max_pages: 15,
            retry_count: 3,
            retry_delay: 2,
            sleep_ms: 250,
            timeout_secs: 10,
            checkpoint_frequency: 20,
            fail_threshold: 10,
            resume: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results: PathBuf,
    pub checkpoint: PathBuf,
    pub log_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results: PathBuf::from("popular_movies.json"),
            checkpoint: PathBuf::from("checkpoint.json"),
            log_file: PathBuf::from("etl_log.txt"),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./cinepipe.toml (current directory)
    /// 2. ~/.config/cinepipe/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("cinepipe.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "cinepipe") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Job settings from the file, before any command-line overrides
    pub fn job(&self) -> cinepipe_tmdb::Config {
        cinepipe_tmdb::Config {
            api_key: self.tmdb.api_key.clone().unwrap_or_default(),
            api_url: self.tmdb.api_url.clone(),
            language: self.tmdb.language.clone(),
            max_pages: self.etl.max_pages,
            retry_count: self.etl.retry_count,
            retry_delay: self.etl.retry_delay,
            sleep_time: std::time::Duration::from_millis(self.etl.sleep_ms),
            timeout: std::time::Duration::from_secs(self.etl.timeout_secs),
            output_file: self.output.results.clone(),
            checkpoint_file: self.output.checkpoint.clone(),
            checkpoint_frequency: self.etl.checkpoint_frequency,
            log_file: self.output.log_file.clone(),
            fail_threshold: self.etl.fail_threshold,
            resume: self.etl.resume,
        }
    }
}
