use anyhow::Result;
use profilescraper::{config::ScrapeConfig, pipeline};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = match ScrapeConfig::load_or_default(".") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("invalid configuration: {:#}", e);
            return Ok(());
        }
    };
    info!(
        url = %cfg.base_url,
        out = %cfg.output_root.display(),
        year = cfg.latest_year,
        "configured"
    );

    // ─── 3) scrape ───────────────────────────────────────────────────
    // Failures are reported, never turned into a non-zero exit.
    match pipeline::run(&cfg).await {
        Ok(summary) => {
            for failed in &summary.failed {
                warn!(url = %failed.url, file = %failed.filename, "not downloaded");
            }
            info!(
                saved = summary.saved.len(),
                failed = summary.failed.len(),
                years = summary.year_dirs.len(),
                "all done"
            );
        }
        Err(e) => error!("error accessing the website: {:#}", e),
    }

    Ok(())
}
