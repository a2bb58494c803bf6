// src/config.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// Page listing the current profile and the table of previous years.
pub const DEFAULT_BASE_URL: &str =
    "https://acl.gov/aging-and-disability-in-america/data-and-research/profile-older-americans";

/// Top-level directory that receives one folder per year.
pub const DEFAULT_OUTPUT_ROOT: &str = "Profile_Older_Americans_Data";

/// Browser-like agent; the site rejects the default reqwest agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Most recent publication year known to be on the page.
pub const DEFAULT_LATEST_YEAR: u16 = 2023;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "profile_scraper.yaml";

/// Everything a run needs to know. Absent YAML fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub output_root: PathBuf,
    pub user_agent: String,
    pub latest_year: u16,
    pub page_timeout_secs: u64,
    pub file_timeout_secs: u64,
    /// Capacity of the buffered writer each download streams through.
    pub write_buffer_bytes: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            latest_year: DEFAULT_LATEST_YEAR,
            page_timeout_secs: 20,
            file_timeout_secs: 15,
            write_buffer_bytes: 8192,
        }
    }
}

impl ScrapeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml).context("parsing scraper config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("loading {:?}", path))
    }

    /// Load `profile_scraper.yaml` from `dir` if present, defaults otherwise.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_yaml_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.page_timeout_secs == 0 || self.file_timeout_secs == 0 {
            bail!("timeouts must be at least one second");
        }
        if self.write_buffer_bytes == 0 {
            bail!("write_buffer_bytes must be non-zero");
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("parsing base URL {}", self.base_url))
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }
}
