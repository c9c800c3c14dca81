//! Page checkpoint: `{"last_page": N}` on disk

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Highest page number fully processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub last_page: u32,
}

impl Checkpoint {
    /// First page a resumed run should fetch
    pub fn next_page(&self) -> u32 {
        self.last_page.saturating_add(1)
    }
}

/// Durable single-value store for the page checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    resume: bool,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>, resume: bool) -> Self {
        Self {
            path: path.into(),
            resume,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.checkpoint_file, config.resume)
    }

    /// Stored checkpoint, only when resuming is enabled and the file exists.
    ///
    /// An unreadable or corrupt file is an error rather than a silent
    /// restart from page 1.
    pub fn load(&self) -> anyhow::Result<Option<Checkpoint>> {
        if !self.resume {
            return Ok(None);
        }
        cinepipe_core::read_json(&self.path)
            .with_context(|| format!("Cannot read checkpoint {}", self.path.display()))
    }

    /// Overwrite the checkpoint with `page` (temp file + rename)
    pub fn save(&self, page: u32) -> anyhow::Result<()> {
        cinepipe_core::write_json_atomic(&self.path, &Checkpoint { last_page: page }, false)
            .with_context(|| format!("Cannot write checkpoint {}", self.path.display()))
    }
}
