use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::{debug, error, info, warn};

use crate::browser::{wait_for, wait_for_any, Browser};
use crate::config::Config;
use crate::geocode::Geocoder;
use crate::model::Homesite;
use crate::output::{self, OutputPaths};
use crate::parser;
use crate::parser::extract::gallery;
use crate::parser::extract::homesites::HomesiteCard;

const PAGE_READY_MARKER: &str = "h1";
const HOMESITE_STATUS: &str = "Move-in Ready";

pub enum Outcome {
    /// Record already on disk; nothing was fetched.
    Skipped(PathBuf),
    Written(PathBuf),
}

/// Batch stats returned after completion.
#[derive(Debug, Default, PartialEq)]
pub struct RunStats {
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Visit each community in order. A failed page is logged and the batch continues.
pub async fn run<B: Browser, G: Geocoder>(
    browser: &B,
    geocoder: &G,
    cfg: &Config,
    urls: &[String],
) -> Result<RunStats> {
    let mut stats = RunStats {
        total: urls.len(),
        ..Default::default()
    };

    let pb = if urls.len() > 1 {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} (eta {eta})")?
                .progress_chars("=> "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    for url in urls {
        match process_community(browser, geocoder, cfg, url).await {
            Ok(Outcome::Written(path)) => {
                info!(url = %url, path = %path.display(), "record written");
                stats.written += 1;
            }
            Ok(Outcome::Skipped(path)) => {
                info!(url = %url, path = %path.display(), "record exists, skipping");
                stats.skipped += 1;
            }
            Err(e) => {
                error!(url = %url, error = %format!("{:#}", e), "community failed");
                stats.errors += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        total = stats.total,
        written = stats.written,
        skipped = stats.skipped,
        errors = stats.errors,
        "batch finished"
    );
    Ok(stats)
}

/// Load, snapshot, extract, enrich and write one community page.
pub async fn process_community<B: Browser, G: Geocoder>(
    browser: &B,
    geocoder: &G,
    cfg: &Config,
    url: &str,
) -> Result<Outcome> {
    let slug = output::community_slug(url);
    let paths = OutputPaths::for_slug(cfg, &slug);
    if paths.is_done() {
        return Ok(Outcome::Skipped(paths.json));
    }

    info!(slug = %slug, "processing community");
    browser.goto(url).await?;
    wait_for(browser, PAGE_READY_MARKER, cfg.page_timeout, cfg.poll_interval)
        .await
        .context("community page never became ready")?;
    settle(cfg.settle_delay).await;

    let html = browser.content().await?;
    output::write_snapshot(&paths.html, &html)?;
    debug!(path = %paths.html.display(), "snapshot saved");

    let timestamp = record_timestamp();
    let mut page = parser::process_page(&html, cfg);
    let cards = std::mem::take(&mut page.homesites);
    let homesites = enrich_homesites(browser, geocoder, cfg, cards).await;

    let record = parser::assemble::build_record(url, timestamp, page, homesites, cfg);
    output::write_record(&paths.json, &record)?;
    Ok(Outcome::Written(paths.json))
}

/// Detail-page images and coordinates for each card, one at a time.
pub async fn enrich_homesites<B: Browser, G: Geocoder>(
    browser: &B,
    geocoder: &G,
    cfg: &Config,
    cards: Vec<HomesiteCard>,
) -> Vec<Homesite> {
    let mut homes = Vec::with_capacity(cards.len());

    for card in cards {
        let images = match fetch_detail_images(browser, cfg, &card.url).await {
            Ok(images) => images,
            Err(e) => {
                warn!(url = %card.url, error = %format!("{:#}", e), "no homesite images");
                Vec::new()
            }
        };

        debug!(
            id = card.id,
            number = %card.address.street_number,
            direction = %card.address.direction,
            street = %card.address.street_name,
            "geocoding homesite"
        );
        let (latitude, longitude) = match geocoder.geocode(&card.address.address).await {
            Some(coords) => coords,
            None => cfg.fallback_coords,
        };

        homes.push(Homesite {
            name: card.address.display_name,
            plan: card.plan,
            id: card.id.to_string(),
            address: card.address.address,
            price: card.price,
            beds: card.beds,
            baths: card.baths,
            sqft: card.sqft,
            status: HOMESITE_STATUS.to_string(),
            image_url: images.first().cloned(),
            url: card.url,
            latitude,
            longitude,
            overview: card.overview,
            images,
        });
    }

    homes
}

async fn fetch_detail_images<B: Browser>(browser: &B, cfg: &Config, url: &str) -> Result<Vec<String>> {
    browser.goto(url).await?;
    let marker = wait_for_any(browser, &gallery::READY_MARKERS, cfg.detail_timeout, cfg.poll_interval).await?;
    debug!(url, marker, "detail page ready");

    let html = browser.content().await?;
    let doc = Html::parse_document(&html);
    Ok(gallery::extract_images(&doc))
}

/// Local time, microsecond precision, no offset.
fn record_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use async_trait::async_trait;

    use super::*;
    use crate::browser::fake::FakeBrowser;
    use crate::geocode::Offline;
    use crate::model::CommunityRecord;

    const COMMUNITY_URL: &str = "https://www.ashtonwoods.com/phoenix/estrella-crossing-community";
    const HOME_1: &str =
        "https://www.ashtonwoods.com/phoenix/estrella-crossing-community/lot-584-5510-w-paseo-way-jade";
    const HOME_2: &str =
        "https://www.ashtonwoods.com/phoenix/estrella-crossing-community/lot-601-5622-w-paseo-way-opal";

    /// Resolves one address, fails the rest.
    struct OneHit {
        calls: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl Geocoder for OneHit {
        async fn geocode(&self, address: &str) -> Option<(f64, f64)> {
            self.calls.borrow_mut().push(address.to_string());
            address.starts_with("5510").then_some((33.36, -112.17))
        }
    }

    fn test_config(name: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("aw_pipeline_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        Config {
            output_dir: dir,
            page_timeout: Duration::from_millis(20),
            detail_timeout: Duration::from_millis(5),
            settle_delay: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
            ..Config::default()
        }
    }

    fn site_browser() -> FakeBrowser {
        let community = fs::read_to_string("tests/fixtures/estrella-crossing.html").unwrap();
        let detail = fs::read_to_string("tests/fixtures/homesite-detail.html").unwrap();
        FakeBrowser::default()
            .with_page(COMMUNITY_URL, &community)
            .with_page(HOME_1, &detail)
            .with_page(HOME_2, "<html><body><p>Not ready</p></body></html>")
    }

    #[test]
    fn timestamp_is_local_iso_with_micros() {
        let re = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}$").unwrap();
        let ts = record_timestamp();
        assert!(re.is_match(&ts), "unexpected timestamp {}", ts);
    }

    #[tokio::test]
    async fn full_page_is_written() {
        let cfg = test_config("full");
        let browser = site_browser();
        let geocoder = OneHit { calls: RefCell::new(Vec::new()) };

        let outcome = process_community(&browser, &geocoder, &cfg, COMMUNITY_URL).await.unwrap();
        let Outcome::Written(path) = outcome else {
            panic!("expected a written record");
        };
        let record: CommunityRecord = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(record.name.as_deref(), Some("Estrella Crossing"));
        assert_eq!(record.homeplans.len(), 2);
        assert_eq!(record.homesites.len(), 2);
        assert_eq!(record.details.sqft_range.as_deref(), Some("1850 - 2240"));
        assert_eq!(record.details.bath_range.as_deref(), Some("2 - 2.5"));
        assert!(OutputPaths::for_slug(&cfg, "estrella-crossing-community").html.exists());

        let first = &record.homesites[0];
        assert_eq!(first.images.len(), 3);
        assert_eq!(first.image_url.as_deref(), Some(first.images[0].as_str()));
        assert_eq!((first.latitude, first.longitude), (33.36, -112.17));

        // Detail page never became ready: kept, no images, fallback coordinates.
        let second = &record.homesites[1];
        assert!(second.images.is_empty());
        assert_eq!((second.latitude, second.longitude), cfg.fallback_coords);
        assert_eq!(second.status, "Move-in Ready");

        assert_eq!(geocoder.calls.borrow().len(), 2);
        fs::remove_dir_all(&cfg.output_dir).ok();
    }

    #[tokio::test]
    async fn existing_record_is_left_untouched() {
        let cfg = test_config("idempotent");
        let paths = OutputPaths::for_slug(&cfg, "estrella-crossing-community");
        fs::create_dir_all(paths.json.parent().unwrap()).unwrap();
        fs::write(&paths.json, "{\"sentinel\": true}").unwrap();

        let browser = site_browser();
        let outcome = process_community(&browser, &Offline, &cfg, COMMUNITY_URL).await.unwrap();

        assert!(matches!(outcome, Outcome::Skipped(_)));
        assert!(browser.visits.borrow().is_empty());
        assert_eq!(fs::read_to_string(&paths.json).unwrap(), "{\"sentinel\": true}");
        assert!(!paths.html.exists());
        fs::remove_dir_all(&cfg.output_dir).ok();
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let cfg = test_config("rerun");
        let browser = site_browser();

        let urls = vec![COMMUNITY_URL.to_string()];
        let first = run(&browser, &Offline, &cfg, &urls).await.unwrap();
        assert_eq!(first.written, 1);
        let path = OutputPaths::for_slug(&cfg, "estrella-crossing-community").json;
        let written = fs::read_to_string(&path).unwrap();

        let visits = browser.visits.borrow().len();
        let second = run(&browser, &Offline, &cfg, &urls).await.unwrap();
        assert_eq!(second.skipped, 1);
        assert_eq!(browser.visits.borrow().len(), visits);
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
        fs::remove_dir_all(&cfg.output_dir).ok();
    }

    #[tokio::test]
    async fn page_load_failure_does_not_stop_batch() {
        let cfg = test_config("batch");
        let browser = site_browser().with_page(
            "https://www.ashtonwoods.com/phoenix/blank-community",
            "<html><body><p>Loading…</p></body></html>",
        );
        let urls = vec![
            "https://www.ashtonwoods.com/phoenix/blank-community".to_string(),
            "https://www.ashtonwoods.com/phoenix/missing-community".to_string(),
            COMMUNITY_URL.to_string(),
        ];

        let stats = run(&browser, &Offline, &cfg, &urls).await.unwrap();
        assert_eq!(
            stats,
            RunStats {
                total: 3,
                written: 1,
                skipped: 0,
                errors: 2,
            }
        );
        assert!(!OutputPaths::for_slug(&cfg, "blank-community").json.exists());
        fs::remove_dir_all(&cfg.output_dir).ok();
    }

    #[tokio::test]
    async fn offline_geocoder_uses_fallback_coordinates() {
        let cfg = Config {
            detail_timeout: Duration::from_millis(5),
            poll_interval: Duration::from_millis(1),
            ..Config::default()
        };
        let html = fs::read_to_string("tests/fixtures/estrella-crossing.html").unwrap();
        let cards = parser::process_page(&html, &cfg).homesites;
        let browser = FakeBrowser::default();

        let homes = enrich_homesites(&browser, &Offline, &cfg, cards).await;
        assert_eq!(homes.len(), 2);
        assert!(homes.iter().all(|h| (h.latitude, h.longitude) == cfg.fallback_coords));
        assert!(homes.iter().all(|h| h.images.is_empty() && h.image_url.is_none()));
        assert_eq!(homes[0].id, "1");
        assert_eq!(homes[0].name, "5510 W Paseo Way, Laveen, AZ");
    }
}
