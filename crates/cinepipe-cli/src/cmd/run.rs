//! Run subcommand - page through TMDB popular movies into the result file

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use cinepipe_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Last listing page to fetch
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Attempts per request
    #[arg(long)]
    pub retry_count: Option<u32>,

    /// Backoff base in seconds (waits base^1, base^2, ... between attempts)
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Pause after each movie, in milliseconds
    #[arg(long)]
    pub sleep_ms: Option<u64>,

    /// Save results and checkpoint every N records
    #[arg(long)]
    pub checkpoint_frequency: Option<usize>,

    /// Failures at which a failed page aborts the run
    #[arg(long)]
    pub fail_threshold: Option<usize>,

    /// Ignore any stored checkpoint and start at page 1
    #[arg(long)]
    pub no_resume: bool,

    /// Result file (JSON array)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Checkpoint file
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Append-only run log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// TMDB `language` parameter (e.g. en-US)
    #[arg(long)]
    pub language: Option<String>,
}

/// Effective job settings: command-line flags over the config file
pub fn job_config(args: &RunArgs, config: &Config) -> cinepipe_tmdb::Config {
    let base = config.job();
    cinepipe_tmdb::Config {
        max_pages: args.max_pages.unwrap_or(base.max_pages),
        retry_count: args.retry_count.unwrap_or(base.retry_count),
        retry_delay: args.retry_delay.unwrap_or(base.retry_delay),
        sleep_time: args
            .sleep_ms
            .map(Duration::from_millis)
            .unwrap_or(base.sleep_time),
        checkpoint_frequency: args
            .checkpoint_frequency
            .unwrap_or(base.checkpoint_frequency),
        fail_threshold: args.fail_threshold.unwrap_or(base.fail_threshold),
        resume: base.resume && !args.no_resume,
        output_file: args.output.clone().unwrap_or(base.output_file.clone()),
        checkpoint_file: args
            .checkpoint
            .clone()
            .unwrap_or(base.checkpoint_file.clone()),
        log_file: args.log_file.clone().unwrap_or(base.log_file.clone()),
        language: args.language.clone().unwrap_or(base.language.clone()),
        ..base
    }
}

pub fn run(job: &cinepipe_tmdb::Config, progress: &SharedProgress) -> Result<()> {
    log::info!("Fetching TMDB popular movies");
    log::info!("  Last page: {}", job.max_pages);
    log::info!("  Output: {}", job.output_file.display());
    log::info!("  Checkpoint: {}", job.checkpoint_file.display());

    let summary = cinepipe_tmdb::run(job, progress)?;

    if progress.is_tty() {
        summary.print();
    } else {
        summary.log();
    }
    Ok(())
}
