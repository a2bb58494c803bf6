// src/fetch/download.rs

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use std::{path::PathBuf, time::Duration};
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{debug, instrument};
use url::Url;

use crate::classify::{filename::strip_query, PlannedFile};
use crate::output::OutputLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Streams planned files into their year folders, one at a time.
pub struct Downloader {
    client: Client,
    layout: OutputLayout,
    timeout: Duration,
    buffer_bytes: usize,
}

impl Downloader {
    pub fn new(client: Client, layout: OutputLayout, timeout: Duration, buffer_bytes: usize) -> Self {
        Self {
            client,
            layout,
            timeout,
            buffer_bytes,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut OutputLayout {
        &mut self.layout
    }

    /// Save `plan` as `<root>/<year>/<filename>`, replacing any earlier copy.
    pub async fn retrieve(&mut self, plan: &PlannedFile) -> Result<SavedFile> {
        let dir = self.layout.ensure_year_dir(plan.year()).await?;
        let path = dir.join(strip_query(&plan.filename));
        let bytes = stream_to_file(
            &self.client,
            &plan.url,
            &path,
            self.timeout,
            self.buffer_bytes,
        )
        .await?;
        Ok(SavedFile { path, bytes })
    }
}

/// GET `url` and write the body to `dest` chunk by chunk.
/// The file is only created once the server has answered with success.
#[instrument(level = "debug", skip(client, url, dest, timeout, buffer_bytes), fields(url = %url, dest = %dest.display()))]
pub async fn stream_to_file(
    client: &Client,
    url: &Url,
    dest: &std::path::Path,
    timeout: Duration,
    buffer_bytes: usize,
) -> Result<u64> {
    let resp = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("non-success status from {}", url))?;

    let file = File::create(dest)
        .await
        .with_context(|| format!("creating {:?}", dest))?;
    let mut out = BufWriter::with_capacity(buffer_bytes, file);

    let mut stream = resp.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("reading body from {}", url))?;
        out.write_all(&chunk)
            .await
            .with_context(|| format!("writing {:?}", dest))?;
        written += chunk.len() as u64;
    }
    out.flush()
        .await
        .with_context(|| format!("flushing {:?}", dest))?;

    debug!(bytes = written, "saved");
    Ok(written)
}
