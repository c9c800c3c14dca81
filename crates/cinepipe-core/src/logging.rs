//! Run log sink: append-only log file plus stderr, with indicatif integration

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Local};
use indicatif::MultiProgress;

/// ANSI color code and padded label for a log level.
fn level_style(level: log::Level, color: bool) -> (&'static str, &'static str, &'static str) {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return ("", label, "");
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    (ansi, label, "\x1b[0m")
}

/// One log file line: `2026-01-02 03:04:05,678 [INFO] message`
pub fn file_line(ts: &DateTime<Local>, level: log::Level, args: &fmt::Arguments<'_>) -> String {
    format!("{} [{level}] {args}", ts.format("%Y-%m-%d %H:%M:%S,%3f"))
}

/// Logger that appends every enabled record to the run's log file and
/// echoes it on stderr (through MultiProgress when bars are active).
pub struct RunLogger {
    inner: env_logger::Logger,
    file: Option<Mutex<File>>,
    multi: Option<MultiProgress>,
}

impl RunLogger {
    pub fn new(inner: env_logger::Logger, file: Option<File>, multi: Option<MultiProgress>) -> Self {
        Self {
            inner,
            file: file.map(Mutex::new),
            multi,
        }
    }

    fn write_file(&self, record: &log::Record) {
        let Some(file) = &self.file else { return };
        let line = file_line(&Local::now(), record.level(), record.args());
        if let Ok(mut f) = file.lock() {
            // A failing log write must not take the job down
            let _ = writeln!(f, "{line}");
        }
    }

    fn write_stderr(&self, record: &log::Record) {
        match &self.multi {
            Some(multi) => {
                let (pre, label, post) = level_style(record.level(), true);
                let line = format!("[{pre}{label}{post}] {}", record.args());
                multi.suspend(|| eprintln!("{line}"));
            }
            None => {
                let (_, label, _) = level_style(record.level(), false);
                eprintln!("[{label}] {}", record.args());
            }
        }
    }
}

impl log::Log for RunLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            self.write_file(record);
            self.write_stderr(record);
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Open the run log for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the process logger.
///
/// Level defaults to `info` (`warn` when quiet, `debug` when debug) and can
/// be overridden with `RUST_LOG`. With `log_file` set, records are also
/// appended there; with `multi` set, stderr output goes through the
/// progress bars.
pub fn init_logging(
    quiet: bool,
    debug: bool,
    log_file: Option<&Path>,
    multi: Option<&MultiProgress>,
) -> io::Result<()> {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let inner =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .build();
    let max_level = inner.filter();
    let file = log_file.map(open_log_file).transpose()?;

    log::set_boxed_logger(Box::new(RunLogger::new(inner, file, multi.cloned())))
        .map_err(io::Error::other)?;
    log::set_max_level(max_level);
    Ok(())
}
