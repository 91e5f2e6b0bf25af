use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::config::Config;
use crate::model::{Amenity, Collection, NearbyPlace};
use crate::parser::dom::{element_text, has_exact_classes, text_nodes};
use crate::parser::text::{extract_price_range, normalize_whitespace};
use crate::parser::ParseError;

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());
static MAIN_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.image-content__main-content").unwrap());
static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static CAROUSEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.image-content__slider-container").unwrap());
static SLIDE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.image-content__slide").unwrap());

static PLANS_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Plans from \$[\d,]+").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{3}\) \d{3}-\d{4}").unwrap());
static AMENITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(RV Garage|Private Bedroom|Covered Entry|Sliding Door)").unwrap()
});

const DESCRIPTION_CLASSES: &str = "js-expando is-initialized is-disabled is-expanded";

pub fn extract_name(doc: &Html) -> Result<String, ParseError> {
    doc.select(&H1)
        .next()
        .ok_or(ParseError::Missing("h1"))
        .and_then(|h1| element_text(h1).ok_or(ParseError::Missing("h1 text")))
}

pub fn extract_price(doc: &Html) -> Result<String, ParseError> {
    let text = first_text_matching(doc, &PLANS_FROM_RE)
        .ok_or(ParseError::NoMatch("\"Plans from $…\""))?;
    extract_price_range(text).ok_or(ParseError::NoMatch("price token"))
}

pub fn extract_phone(doc: &Html) -> Result<String, ParseError> {
    first_text_matching(doc, &PHONE_RE)
        .and_then(normalize_whitespace)
        .ok_or(ParseError::NoMatch("phone number"))
}

/// First paragraph of the expanded description block. The container's class
/// attribute must match exactly; a collapsed variant does not count.
pub fn extract_description(doc: &Html) -> Result<String, ParseError> {
    let container = doc
        .select(&DIV)
        .find(|d| has_exact_classes(*d, DESCRIPTION_CLASSES))
        .ok_or(ParseError::Missing("expanded description container"))?;
    let content = container
        .select(&MAIN_CONTENT)
        .next()
        .ok_or(ParseError::Missing("description content"))?;
    content
        .select(&P)
        .next()
        .and_then(element_text)
        .ok_or(ParseError::Missing("description paragraph"))
}

/// Desktop image of the first carousel slide that has one.
pub fn extract_carousel_image(doc: &Html) -> Result<String, ParseError> {
    let carousel = doc
        .select(&CAROUSEL)
        .next()
        .ok_or(ParseError::Missing("image carousel"))?;
    carousel
        .select(&SLIDE)
        .find_map(|slide| slide.value().attr("data-desktop-image"))
        .map(str::to_string)
        .ok_or(ParseError::Missing("carousel desktop image"))
}

/// Name and description both carry the matched text; the site exposes no
/// separate description.
pub fn extract_amenities(doc: &Html) -> Vec<Amenity> {
    text_nodes(doc)
        .filter(|t| AMENITY_RE.is_match(t))
        .filter_map(normalize_whitespace)
        .map(|text| Amenity {
            name: text.clone(),
            description: text,
            icon_url: None,
        })
        .collect()
}

/// The site lists no nearby places.
pub fn nearby_places() -> Vec<NearbyPlace> {
    Vec::new()
}

/// Configured placeholder; collections are not present in the page markup.
pub fn collections(cfg: &Config) -> Vec<Collection> {
    cfg.collection_names
        .iter()
        .map(|name| Collection {
            name: name.clone(),
            id: "0".to_string(),
            is_active: true,
            nearby_schools: Vec::new(),
        })
        .collect()
}

fn first_text_matching<'a>(doc: &'a Html, re: &Regex) -> Option<&'a str> {
    text_nodes(doc).find(|t| re.is_match(t))
}
