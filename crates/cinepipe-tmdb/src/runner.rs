//! ETL driver: resume, page loop, per-movie fetch, checkpoint cadence

use std::time::{Duration, Instant};

use anyhow::Context;
use cinepipe_core::{ProgressContext, fmt_num};
use indicatif::ProgressBar;
use serde_json::Value;

use crate::api::{MovieSource, TmdbClient};
use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::stats::Summary;
use crate::store::ResultStore;
use crate::transform::{MovieRecord, transform};

/// Run the job against the live TMDB API
pub fn run(config: &Config, progress: &ProgressContext) -> anyhow::Result<Summary> {
    config.validate()?;
    let source = TmdbClient::from_config(config)?;
    run_with_source(config, &source, progress)
}

/// Run the job against any [`MovieSource`].
///
/// Fetch failures never surface as errors: they feed the failure counter,
/// and a failed page that brings it to `fail_threshold` stops the loop
/// early. Either way the result set and a final checkpoint of `max_pages`
/// are saved. Only local I/O (stores) returns `Err`.
pub fn run_with_source<S: MovieSource>(
    config: &Config,
    source: &S,
    progress: &ProgressContext,
) -> anyhow::Result<Summary> {
    run_paced(config, source, progress, &mut std::thread::sleep)
}

/// [`run_with_source`] with the pacing pause supplied by the caller
fn run_paced<S: MovieSource>(
    config: &Config,
    source: &S,
    progress: &ProgressContext,
    pause: &mut dyn FnMut(Duration),
) -> anyhow::Result<Summary> {
    config.validate()?;
    let start = Instant::now();

    let mut job = Job::new(config, source, progress.stage_line("tmdb"), pause);
    let start_page = job.resume()?;
    job.summary.start_page = start_page;

    log::info!(
        "TMDB ETL starting: pages {start_page}..={}, checkpoint every {} movies",
        config.max_pages,
        config.checkpoint_frequency
    );

    for page in start_page..=config.max_pages {
        if job.process_page(page)? == PageOutcome::Abort {
            job.summary.aborted = true;
            break;
        }
    }

    let mut summary = job.finish()?;
    summary.elapsed = start.elapsed();
    Ok(summary)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Processed,
    Skipped,
    Abort,
}

/// A payload the job can use: not `null`, `false`, `0`, `""`, `{}` or `[]`
fn has_payload(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
    }
}

/// In-process state of one run
struct Job<'a, S> {
    config: &'a Config,
    source: &'a S,
    checkpoints: CheckpointStore,
    results: ResultStore,
    movies: Vec<MovieRecord>,
    failures: usize,
    summary: Summary,
    bar: ProgressBar,
    pause: &'a mut dyn FnMut(Duration),
}

impl<'a, S: MovieSource> Job<'a, S> {
    fn new(
        config: &'a Config,
        source: &'a S,
        bar: ProgressBar,
        pause: &'a mut dyn FnMut(Duration),
    ) -> Self {
        Self {
            config,
            source,
            checkpoints: CheckpointStore::from_config(config),
            results: ResultStore::from_config(config),
            movies: Vec::new(),
            failures: 0,
            summary: Summary::default(),
            bar,
            pause,
        }
    }

    /// First page to fetch. A stored checkpoint also brings back the
    /// records saved alongside it.
    fn resume(&mut self) -> anyhow::Result<u32> {
        let Some(checkpoint) = self.checkpoints.load()? else {
            return Ok(1);
        };
        self.movies = self
            .results
            .load()
            .context("Cannot resume: saved results unreadable")?;
        log::info!(
            "Resuming after page {} with {} saved movies",
            checkpoint.last_page,
            fmt_num(self.movies.len())
        );
        Ok(checkpoint.next_page())
    }

    fn process_page(&mut self, page: u32) -> anyhow::Result<PageOutcome> {
        log::info!("Fetching page {page}");
        self.summary.pages_attempted += 1;
        self.summary.last_page = Some(page);
        self.bar.set_message(format!(
            "page {page}/{} · {} movies",
            self.config.max_pages,
            fmt_num(self.movies.len())
        ));

        let Some(listing) = self.source.popular_page(page).filter(has_payload) else {
            self.failures += 1;
            self.summary.pages_failed += 1;
            log::warn!("Failed to fetch popular movies for page {page}");
            if self.failures >= self.config.fail_threshold {
                log::error!(
                    "Too many failures ({}/{}). Aborting ETL job.",
                    self.failures,
                    self.config.fail_threshold
                );
                return Ok(PageOutcome::Abort);
            }
            return Ok(PageOutcome::Skipped);
        };

        let movies = listing
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for movie in movies {
            self.process_movie(page, movie)?;
        }
        Ok(PageOutcome::Processed)
    }

    fn process_movie(&mut self, page: u32, movie: &Value) -> anyhow::Result<()> {
        let raw_id = movie.get("id").unwrap_or(&Value::Null);
        let Some(id) = raw_id.as_u64() else {
            self.skip_movie(raw_id);
            return Ok(());
        };

        // Both requests always go out, in this order
        let detail = self.source.movie_detail(id).filter(has_payload);
        let credits = self.source.movie_credits(id).filter(has_payload);
        let (Some(detail), Some(credits)) = (detail, credits) else {
            self.skip_movie(raw_id);
            return Ok(());
        };

        let record = transform(&detail, &credits);
        log::debug!(
            "Movie {id}: {}",
            record
                .title
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or("<untitled>")
        );
        self.movies.push(record);
        self.summary.records_fetched += 1;

        if self.movies.len() % self.config.checkpoint_frequency == 0 {
            self.commit(page)?;
            log::info!("Checkpoint saved at {} movies", self.movies.len());
        }

        (self.pause)(self.config.sleep_time);
        Ok(())
    }

    fn skip_movie(&mut self, id: &Value) {
        self.failures += 1;
        self.summary.movies_skipped += 1;
        log::warn!("Skipping movie {id} due to missing data");
    }

    /// Results first, then the marker: the checkpoint never points past
    /// data that is on disk.
    fn commit(&mut self, page: u32) -> anyhow::Result<()> {
        self.results.save(&self.movies)?;
        self.checkpoints.save(page)?;
        self.summary.checkpoints_written += 1;
        Ok(())
    }

    fn finish(mut self) -> anyhow::Result<Summary> {
        self.commit(self.config.max_pages)?;
        self.bar.finish_and_clear();

        self.summary.failures = self.failures;
        self.summary.total_records = self.movies.len();
        if self.summary.aborted {
            log::warn!(
                "ETL job aborted after page {}; saved {} movies",
                self.summary.last_page.unwrap_or(0),
                fmt_num(self.movies.len())
            );
        } else {
            log::info!(
                "ETL job completed successfully: {} movies",
                fmt_num(self.movies.len())
            );
        }
        Ok(self.summary)
    }
}
