//! End-of-run summary

use std::time::Duration;

use cinepipe_core::fmt_num;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

/// What one ETL run did.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// First page fetched (after resume)
    pub start_page: u32,
    /// Last page the loop reached, if any
    pub last_page: Option<u32>,
    /// Listing pages requested
    pub pages_attempted: usize,
    /// Listing pages that failed after retries
    pub pages_failed: usize,
    /// Movies dropped for missing detail or credits
    pub movies_skipped: usize,
    /// Records transformed in this run
    pub records_fetched: usize,
    /// Size of the saved result set (includes records from earlier runs)
    pub total_records: usize,
    /// Checkpoint writes, final one included
    pub checkpoints_written: usize,
    /// Failure counter at the end of the run
    pub failures: usize,
    /// Stopped early on the failure threshold
    pub aborted: bool,
    pub elapsed: Duration,
}

impl Summary {
    pub fn status(&self) -> &'static str {
        if self.aborted { "aborted" } else { "completed" }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let pages = match self.last_page {
            Some(last) => format!("{}..={last}", self.start_page),
            None => "none".to_string(),
        };
        vec![
            ("Status", self.status().to_string()),
            ("Pages", pages),
            (
                "Pages failed",
                format!("{} / {}", self.pages_failed, self.pages_attempted),
            ),
            ("Movies skipped", fmt_num(self.movies_skipped)),
            ("Records (this run)", fmt_num(self.records_fetched)),
            ("Records (total)", fmt_num(self.total_records)),
            ("Checkpoints", self.checkpoints_written.to_string()),
            ("Failures", self.failures.to_string()),
            ("Elapsed", format!("{:.1}s", self.elapsed.as_secs_f64())),
        ]
    }

    /// Render as a table on stderr (TTY mode)
    pub fn print(&self) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("TMDB popular").fg(Color::Cyan),
                Cell::new("Value").fg(Color::Cyan),
            ]);
        for (label, value) in self.rows() {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        eprintln!("\n{table}");
    }

    /// Log one line per metric (non-TTY mode)
    pub fn log(&self) {
        log::info!("=== TMDB ETL Summary ===");
        for (label, value) in self.rows() {
            log::info!("{label}: {value}");
        }
    }
}
