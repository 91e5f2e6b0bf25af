pub mod address;
pub mod cards;
pub mod community;
pub mod gallery;
pub mod homesites;
pub mod plans;

use scraper::Html;

use super::ParseError;
use crate::config::Config;
use crate::model::{AddressInfo, Amenity, Collection, HomePlan, NearbyPlace};
use homesites::HomesiteCard;

/// Everything read from one community page. Single-value fields keep their
/// `Result` so the assembler decides how a failed step degrades.
#[derive(Debug)]
pub struct ExtractedPage {
    pub name: Result<String, ParseError>,
    pub price: Result<String, ParseError>,
    pub address: AddressInfo,
    pub phone: Result<String, ParseError>,
    pub description: Result<String, ParseError>,
    pub carousel_image: Result<String, ParseError>,
    pub homeplans: Vec<HomePlan>,
    pub homesites: Vec<HomesiteCard>,
    pub amenities: Vec<Amenity>,
    pub nearby_places: Vec<NearbyPlace>,
    pub collections: Vec<Collection>,
}

pub fn extract_all(doc: &Html, cfg: &Config) -> ExtractedPage {
    ExtractedPage {
        name: community::extract_name(doc),
        price: community::extract_price(doc),
        address: address::parse_community_address(doc, &cfg.market),
        phone: community::extract_phone(doc),
        description: community::extract_description(doc),
        carousel_image: community::extract_carousel_image(doc),
        homeplans: plans::extract(doc, cfg),
        homesites: homesites::extract(doc, cfg),
        amenities: community::extract_amenities(doc),
        nearby_places: community::nearby_places(),
        collections: community::collections(cfg),
    }
}

// ── Tests ──
