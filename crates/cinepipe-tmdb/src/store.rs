//! Result set file: the whole set rewritten as one indented JSON array

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::Config;
use crate::transform::MovieRecord;

#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.output_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file with `records`. No append: every call writes the
    /// full set, through a temp file so a crash keeps the previous save.
    pub fn save(&self, records: &[MovieRecord]) -> anyhow::Result<()> {
        cinepipe_core::write_json_atomic(&self.path, records, true)
            .with_context(|| format!("Cannot write results {}", self.path.display()))
    }

    /// Previously saved records; empty when the file does not exist
    pub fn load(&self) -> anyhow::Result<Vec<MovieRecord>> {
        let records: Option<Vec<MovieRecord>> = cinepipe_core::read_json(&self.path)
            .with_context(|| format!("Cannot read results {}", self.path.display()))?;
        Ok(records.unwrap_or_default())
    }
}
