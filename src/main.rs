mod browser;
mod config;
mod geocode;
mod model;
mod output;
mod parser;
mod pipeline;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use browser::ChromeSession;
use config::{Config, DEFAULT_COMMUNITY_URL, DEFAULT_LINKS_FILE, DEFAULT_OUTPUT_DIR};
use geocode::{Nominatim, Offline};

#[derive(Parser)]
#[command(
    name = "aw_scraper",
    about = "Ashton Woods community scraper: plans, move-in-ready homes, amenities"
)]
struct Cli {
    /// Community page to scrape (ignored with --batch)
    #[arg(long)]
    url: Option<String>,

    /// Scrape every URL listed in the links file
    #[arg(long)]
    batch: bool,

    /// JSON array of community URLs used by --batch
    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    links_file: PathBuf,

    /// Root for html/ snapshots and json/ records
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Seconds to wait for a community page heading
    #[arg(long, default_value = "20")]
    page_timeout_secs: u64,

    /// Seconds to wait for each homesite detail marker
    #[arg(long, default_value = "10")]
    detail_timeout_secs: u64,

    /// Extra pause after the community page is ready, in milliseconds
    #[arg(long, default_value = "5000")]
    settle_ms: u64,

    /// Skip Nominatim lookups; homesites get the fallback coordinates
    #[arg(long)]
    no_geocode: bool,

    /// Show the browser window
    #[arg(long)]
    visible: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            output_dir: self.output_dir.clone(),
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            detail_timeout: Duration::from_secs(self.detail_timeout_secs),
            settle_delay: Duration::from_millis(self.settle_ms),
            geocode: !self.no_geocode,
            headless: !self.visible,
            ..Config::default()
        }
    }

    fn urls(&self) -> anyhow::Result<Vec<String>> {
        if self.batch {
            return output::load_links(&self.links_file);
        }
        Ok(vec![self
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_COMMUNITY_URL.to_string())])
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = cli.config();

    let urls = cli.urls()?;
    if urls.is_empty() {
        println!("No community URLs to scrape.");
        return Ok(());
    }
    info!(count = urls.len(), output = %cfg.output_dir.display(), "starting");

    let session = ChromeSession::launch(&cfg).await?;
    let result = if cfg.geocode {
        let geocoder = Nominatim::new(&cfg)?;
        pipeline::run(&session, &geocoder, &cfg, &urls).await
    } else {
        pipeline::run(&session, &Offline, &cfg, &urls).await
    };
    // Release the browser whether or not the batch succeeded.
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "browser did not shut down cleanly");
    }
    let stats = result?;

    println!(
        "Done: {} communities ({} written, {} skipped, {} errors).",
        stats.total, stats.written, stats.skipped, stats.errors
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Finished in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
