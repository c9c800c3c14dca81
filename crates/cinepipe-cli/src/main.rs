//! cinepipe - TMDB popular-movies catalog ETL
//!
//! Pages through the TMDB popular listing, enriches every movie with its
//! detail and credits, and keeps a resumable JSON result set on disk.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "cinepipe")]
#[command(about = "Resumable ETL for the TMDB popular-movies catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,

    /// Config file path (default: ./cinepipe.toml or ~/.config/cinepipe/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch popular movies into the result file
    Run(cmd::run::RunArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(cinepipe_core::ProgressContext::new());
    let multi = progress.is_tty().then(|| progress.multi());

    // Load configuration
    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Run(args) => {
            let job = cmd::run::job_config(&args, &config);
            // Sink needs the job's log file path
            cinepipe_core::init_logging(cli.quiet, cli.debug, Some(&job.log_file), multi)?;
            cmd::run::run(&job, &progress)
        }
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            cinepipe_core::init_logging(cli.quiet, cli.debug, None, multi)?;
            let job = config.job();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["TMDB API URL", &job.api_url]);
            table.add_row(vec![
                "TMDB API key",
                if job.api_key.trim().is_empty() {
                    "not set"
                } else {
                    "configured"
                },
            ]);
            table.add_row(vec!["Language", &job.language]);
            table.add_row(vec!["Max pages", &job.max_pages.to_string()]);
            table.add_row(vec![
                "Retries",
                &format!("{} (delay base {}s)", job.retry_count, job.retry_delay),
            ]);
            table.add_row(vec![
                "Sleep",
                &format!("{}ms", job.sleep_time.as_millis()),
            ]);
            table.add_row(vec!["Timeout", &format!("{}s", job.timeout.as_secs())]);
            table.add_row(vec![
                "Checkpoint every",
                &format!("{} movies", job.checkpoint_frequency),
            ]);
            table.add_row(vec!["Fail threshold", &job.fail_threshold.to_string()]);
            table.add_row(vec!["Resume", if job.resume { "yes" } else { "no" }]);
            table.add_row(vec!["Results", &job.output_file.display().to_string()]);
            table.add_row(vec![
                "Checkpoint",
                &job.checkpoint_file.display().to_string(),
            ]);
            table.add_row(vec!["Log file", &job.log_file.display().to_string()]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
