use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_COMMUNITY_URL: &str =
    "https://www.ashtonwoods.com/phoenix/estrella-crossing-community?comm=PHO|MCESCR#quick-move-ins";
pub const DEFAULT_LINKS_FILE: &str = "ashtonwoods_links.json";
pub const DEFAULT_OUTPUT_DIR: &str = "data/ashtonwoods";

/// Site constants and run-time knobs. `Default` carries the values for the
/// Ashton Woods Phoenix market; the CLI overrides the timing and output fields.
#[derive(Debug, Clone)]
pub struct Config {
    pub site_origin: String,
    pub builder: String,
    pub market: String,
    /// Coordinates used for the community location and for homesites whose
    /// lookup fails.
    pub fallback_coords: (f64, f64),
    pub homesite_city: String,
    pub homesite_state: String,
    pub homesite_zip: String,
    pub collection_names: Vec<String>,
    pub file_prefix: String,
    pub output_dir: PathBuf,

    pub page_timeout: Duration,
    pub detail_timeout: Duration,
    pub settle_delay: Duration,
    pub poll_interval: Duration,

    pub geocode: bool,
    pub geocoder_url: String,
    pub geocoder_agent: String,
    pub geocode_delay: Duration,
    pub geocode_timeout: Duration,
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_origin: "https://www.ashtonwoods.com".into(),
            builder: "Ashton Woods".into(),
            market: "Phoenix".into(),
            fallback_coords: (33.3539, -112.1597),
            homesite_city: "Laveen".into(),
            homesite_state: "AZ".into(),
            homesite_zip: "85339".into(),
            collection_names: vec!["Estates at Estrella Crossing".into()],
            file_prefix: "ashtonwoods".into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),

            page_timeout: Duration::from_secs(20),
            detail_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(5),
            poll_interval: Duration::from_millis(250),

            geocode: true,
            geocoder_url: "https://nominatim.openstreetmap.org/search".into(),
            geocoder_agent: "ashtonwoods_scraper".into(),
            geocode_delay: Duration::from_secs(1),
            geocode_timeout: Duration::from_secs(10),
            headless: true,
        }
    }
}

impl Config {
    pub fn html_dir(&self) -> PathBuf {
        self.output_dir.join("html")
    }

    pub fn json_dir(&self) -> PathBuf {
        self.output_dir.join("json")
    }

    /// Absolute URL for a site-relative href. Already absolute hrefs pass through.
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}{}", self.site_origin, href)
        }
    }
}
