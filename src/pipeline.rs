// src/pipeline.rs
//! One run: fetch the index page, plan the latest and historical files,
//! download them in document order.

use anyhow::{Context, Result};
use tracing::{error, info, trace, warn};
use url::Url;

use crate::{
    classify::{plan_latest, plan_row, PlannedFile},
    config::ScrapeConfig,
    fetch::{build_client, fetch_page, Downloader, SavedFile},
    output::OutputLayout,
    page::{ProfilePage, StructureError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub url: Url,
    pub filename: String,
    pub error: String,
}

/// What a completed run did. Failures in here never fail the run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub saved: Vec<SavedFile>,
    pub failed: Vec<FailedDownload>,
    /// Set when the previous profiles section could not be located.
    pub history_issue: Option<StructureError>,
    /// Historical rows without a single usable year.
    pub skipped_rows: usize,
    /// Year folders created or confirmed, ascending.
    pub year_dirs: Vec<u16>,
}

/// Run the whole scrape. Only a failed page fetch is returned as `Err`;
/// nothing is written to disk in that case.
pub async fn run(cfg: &ScrapeConfig) -> Result<RunSummary> {
    cfg.validate()?;
    let base = cfg.base_url()?;
    let client = build_client(cfg)?;

    info!(url = %base, "starting data scrape");
    let html = fetch_page(&client, &base, cfg.page_timeout())
        .await
        .context("accessing the profile page")?;
    let page = ProfilePage::parse(&html, base);

    let mut downloader = Downloader::new(
        client,
        OutputLayout::new(&cfg.output_root),
        cfg.file_timeout(),
        cfg.write_buffer_bytes,
    );
    let mut summary = RunSummary::default();

    // ─── latest profile ──────────────────────────────────────────────
    info!(year = cfg.latest_year, "scraping latest profile");
    let latest = plan_latest(
        &page.latest_links(cfg.latest_year),
        page.base_url(),
        cfg.latest_year,
    );
    for plan in &latest {
        retrieve_one(&mut downloader, plan, &mut summary).await;
    }

    // ─── previous profiles table ─────────────────────────────────────
    info!("scraping previous profiles");
    match page.previous_profiles() {
        Ok(rows) => {
            for row in &rows {
                let Some(plan) = plan_row(row, page.base_url()) else {
                    trace!(cell = row.first_cell(), "no single year in row");
                    summary.skipped_rows += 1;
                    continue;
                };

                info!(year = plan.year, files = plan.files.len(), "processing year");
                if let Err(e) = downloader.layout_mut().ensure_year_dir(plan.year).await {
                    let error = format!("{:#}", e);
                    error!(year = plan.year, error = %error, "cannot create year folder");
                    for file in &plan.files {
                        summary.failed.push(FailedDownload {
                            url: file.url.clone(),
                            filename: file.filename.clone(),
                            error: error.clone(),
                        });
                    }
                    continue;
                }

                for file in &plan.files {
                    retrieve_one(&mut downloader, file, &mut summary).await;
                }
            }
        }
        Err(issue) => {
            warn!("{}", issue);
            summary.history_issue = Some(issue);
        }
    }

    summary.year_dirs = downloader.layout().years().collect();
    info!(
        saved = summary.saved.len(),
        failed = summary.failed.len(),
        "scraping complete"
    );
    Ok(summary)
}

async fn retrieve_one(downloader: &mut Downloader, plan: &PlannedFile, summary: &mut RunSummary) {
    info!(file = %plan.filename, "downloading");
    match downloader.retrieve(plan).await {
        Ok(saved) => {
            info!(path = %saved.path.display(), bytes = saved.bytes, "saved");
            summary.saved.push(saved);
        }
        Err(e) => {
            let error = format!("{:#}", e);
            error!(url = %plan.url, file = %plan.filename, error = %error, "download failed");
            summary.failed.push(FailedDownload {
                url: plan.url.clone(),
                filename: plan.filename.clone(),
                error,
            });
        }
    }
}
