// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::ScrapeConfig;

pub mod download;
pub mod page;

pub use download::{Downloader, SavedFile};
pub use page::fetch_page;

/// Shared client for the page and every file; sends the configured User-Agent.
pub fn build_client(cfg: &ScrapeConfig) -> Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .build()
        .context("building HTTP client")
}
