use serde::{Deserialize, Serialize};

// ── Community ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityRecord {
    pub timestamp: String,
    pub url: String,
    pub builder: String,
    pub status: Option<String>,
    pub name: Option<String>,
    pub price_from: Option<String>,
    /// Full sales office address, `""` when it could not be parsed.
    pub address: String,
    pub location: Location,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub homeplans: Vec<HomePlan>,
    pub homesites: Vec<Homesite>,
    pub details: DetailsSummary,
    pub amenities: Vec<Amenity>,
    pub nearbyplaces: Vec<NearbyPlace>,
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: LocationAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAddress {
    pub city: String,
    pub state: String,
    pub market: String,
}

/// Parsed "Sales Office" block. Either fully populated or all-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressInfo {
    pub full_address: String,
    pub city: String,
    pub state: String,
    pub market: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsSummary {
    pub price_range: Option<String>,
    pub sqft_range: Option<String>,
    pub bed_range: Option<String>,
    pub bath_range: Option<String>,
    pub stories_range: String,
    pub community_count: u32,
}

// ── Plans & homes ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomePlan {
    pub name: String,
    pub url: String,
    pub details: PlanDetails,
    #[serde(rename = "includedFeatures")]
    pub included_features: Vec<IncludedFeature>,
    pub floorplan_images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDetails {
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub sqft: Option<String>,
    pub status: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludedFeature {
    pub section_index: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homesite {
    /// Street address without the ZIP, e.g. `5510 W Paseo Way, Laveen, AZ`.
    pub name: String,
    pub plan: Option<String>,
    pub id: String,
    pub address: String,
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub sqft: Option<String>,
    pub status: String,
    pub image_url: Option<String>,
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub overview: Option<String>,
    pub images: Vec<String>,
}

// ── Static / placeholder sections ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub name: String,
    pub description: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub id: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "nearbySchools")]
    pub nearby_schools: Vec<String>,
}
