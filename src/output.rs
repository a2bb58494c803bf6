// src/output.rs

use anyhow::{Context, Result};
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::debug;

/// `<root>/<year>/` folders, created on first use and at most once per run.
#[derive(Debug)]
pub struct OutputLayout {
    root: PathBuf,
    ensured: BTreeSet<u16>,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ensured: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn year_dir(&self, year: u16) -> PathBuf {
        self.root.join(year.to_string())
    }

    /// Create the folder for `year` if this run has not done so yet.
    /// A directory left over from an earlier run is fine.
    pub async fn ensure_year_dir(&mut self, year: u16) -> Result<PathBuf> {
        let dir = self.year_dir(year);
        if self.ensured.insert(year) {
            if let Err(e) = fs::create_dir_all(&dir).await {
                self.ensured.remove(&year);
                return Err(e).with_context(|| format!("creating {:?}", dir));
            }
            debug!(dir = %dir.display(), "year folder ready");
        }
        Ok(dir)
    }

    /// Years whose folder this run has created or confirmed.
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.ensured.iter().copied()
    }
}
