use tracing::warn;

use super::extract::ExtractedPage;
use super::ParseError;
use crate::config::Config;
use crate::model::{CommunityRecord, DetailsSummary, HomePlan, Homesite, Location, LocationAddress};

const STORIES_RANGE: &str = "1 - 2";
const COMMUNITY_COUNT: u32 = 1;

/// True numeric min/max over the values that parse as numbers.
pub fn range_of<S: AsRef<str>>(values: &[S]) -> Option<String> {
    let nums: Vec<f64> = values
        .iter()
        .filter_map(|v| v.as_ref().trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .collect();
    let min = nums.iter().copied().reduce(f64::min)?;
    let max = nums.iter().copied().reduce(f64::max)?;

    if min == max {
        Some(format_number(min))
    } else {
        Some(format!("{} - {}", format_number(min), format_number(max)))
    }
}

/// `2000.0` → `2000`, `2.5` → `2.5`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Homesite values first; a field with no numeric homesite values falls back to the plans.
pub fn details_summary(
    price_range: Option<String>,
    homesites: &[Homesite],
    homeplans: &[HomePlan],
) -> DetailsSummary {
    let sqft = with_fallback(homesites, homeplans, |h| h.sqft.as_ref(), |p| p.details.sqft.as_ref());
    let beds = with_fallback(homesites, homeplans, |h| h.beds.as_ref(), |p| p.details.beds.as_ref());
    let baths = with_fallback(homesites, homeplans, |h| h.baths.as_ref(), |p| p.details.baths.as_ref());

    DetailsSummary {
        price_range,
        sqft_range: range_of(&sqft),
        bed_range: range_of(&beds),
        bath_range: range_of(&baths),
        stories_range: STORIES_RANGE.to_string(),
        community_count: COMMUNITY_COUNT,
    }
}

fn with_fallback<'a>(
    homesites: &'a [Homesite],
    homeplans: &'a [HomePlan],
    site: fn(&Homesite) -> Option<&String>,
    plan: fn(&HomePlan) -> Option<&String>,
) -> Vec<&'a String> {
    let from_sites: Vec<&String> = homesites.iter().filter_map(site).filter(|v| is_numeric(v)).collect();
    if from_sites.is_empty() {
        homeplans.iter().filter_map(plan).collect()
    } else {
        from_sites
    }
}

fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// Carousel image, else the first plan image, else the first homesite image.
fn primary_images(
    carousel: Option<String>,
    homeplans: &[HomePlan],
    homesites: &[Homesite],
) -> Vec<String> {
    carousel
        .or_else(|| homeplans.iter().find_map(|p| p.details.image_url.clone()))
        .or_else(|| homesites.iter().find_map(|h| h.image_url.clone()))
        .into_iter()
        .collect()
}

/// Combine one page's extraction results and its enriched homesites.
pub fn build_record(
    url: &str,
    timestamp: String,
    page: ExtractedPage,
    homesites: Vec<Homesite>,
    cfg: &Config,
) -> CommunityRecord {
    let name = step("name", page.name);
    let price_from = step("price", page.price);
    let phone = step("phone", page.phone);
    let description = step("description", page.description);
    let carousel = step("carousel image", page.carousel_image);

    let images = primary_images(carousel, &page.homeplans, &homesites);
    let details = details_summary(price_from.clone(), &homesites, &page.homeplans);
    let (latitude, longitude) = cfg.fallback_coords;

    CommunityRecord {
        timestamp,
        url: url.to_string(),
        builder: cfg.builder.clone(),
        status: None,
        name,
        price_from,
        address: page.address.full_address,
        location: Location {
            latitude,
            longitude,
            address: LocationAddress {
                city: page.address.city,
                state: page.address.state,
                market: page.address.market,
            },
        },
        phone,
        description,
        images,
        homeplans: page.homeplans,
        homesites,
        details,
        amenities: page.amenities,
        nearbyplaces: page.nearby_places,
        collections: page.collections,
    }
}

fn step<T>(field: &'static str, result: Result<T, ParseError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(field, error = %e, "field not extracted");
            None
        }
    }
}
