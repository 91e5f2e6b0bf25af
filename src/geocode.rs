use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;

/// Address → (latitude, longitude). `None` on any failure; callers substitute
/// fallback coordinates.
#[async_trait(?Send)]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Option<(f64, f64)>;
}

/// OpenStreetMap Nominatim, one request at a time with a fixed pause after each.
pub struct Nominatim {
    client: reqwest::Client,
    search_url: String,
    delay: Duration,
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Nominatim {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.geocoder_agent.as_str())
            .timeout(cfg.geocode_timeout)
            .build()
            .context("failed to build geocoding client")?;
        Ok(Self {
            client,
            search_url: cfg.geocoder_url.clone(),
            delay: cfg.geocode_delay,
        })
    }

    async fn lookup(&self, address: &str) -> Result<Option<(f64, f64)>> {
        let places: Vec<Place> = self
            .client
            .get(&self.search_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match places.into_iter().next() {
            Some(place) => Ok(Some((place.lat.parse()?, place.lon.parse()?))),
            None => Ok(None),
        }
    }
}

#[async_trait(?Send)]
impl Geocoder for Nominatim {
    async fn geocode(&self, address: &str) -> Option<(f64, f64)> {
        let result = self.lookup(address).await;
        // Rate limit applies to failed calls too.
        tokio::time::sleep(self.delay).await;

        match result {
            Ok(Some(coords)) => Some(coords),
            Ok(None) => {
                debug!(address, "no geocoding match");
                None
            }
            Err(e) => {
                warn!(address, error = %e, "geocoding failed");
                None
            }
        }
    }
}

/// Never looks anything up. Used with `--no-geocode`.
pub struct Offline;

#[async_trait(?Send)]
impl Geocoder for Offline {
    async fn geocode(&self, _address: &str) -> Option<(f64, f64)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_response_shape() {
        let body = r#"[{"place_id": 1, "lat": "33.3541", "lon": "-112.1612", "display_name": "5510 W Paseo Way"}]"#;
        let places: Vec<Place> = serde_json::from_str(body).unwrap();
        assert_eq!(places[0].lat.parse::<f64>().unwrap(), 33.3541);
        assert_eq!(places[0].lon.parse::<f64>().unwrap(), -112.1612);
    }

    #[tokio::test]
    async fn failed_lookup_still_waits() {
        let cfg = Config {
            // Nothing listens on the discard port.
            geocoder_url: "http://127.0.0.1:9/search".into(),
            geocode_delay: Duration::from_millis(150),
            geocode_timeout: Duration::from_secs(2),
            ..Config::default()
        };
        let geocoder = Nominatim::new(&cfg).unwrap();

        let started = tokio::time::Instant::now();
        let coords = geocoder.geocode("5510 W Paseo Way, Laveen, AZ 85339").await;
        assert_eq!(coords, None);
        assert!(started.elapsed() >= cfg.geocode_delay);
    }

    #[tokio::test]
    async fn offline_never_resolves() {
        assert_eq!(Offline.geocode("5510 W Paseo Way, Laveen, AZ 85339").await, None);
    }
}
