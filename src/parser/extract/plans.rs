use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::cards::{cards_in_panel, parse_card};
use crate::config::Config;
use crate::model::{HomePlan, IncludedFeature, PlanDetails};
use crate::parser::dom::element_text;
use crate::parser::ParseError;

pub const PANEL_ID: &str = "panel-home-plans";
const PLAN_STATUS: &str = "Actively selling";

static IMAGE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.property-card__image").unwrap());
static CONTENT_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.property-card__content li").unwrap());
static STYLE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\('([^']+)'\)").unwrap());

pub fn extract(doc: &Html, cfg: &Config) -> Vec<HomePlan> {
    let mut plans = Vec::new();

    for card in cards_in_panel(doc, PANEL_ID) {
        match parse_plan(card, cfg) {
            Ok(plan) => plans.push(plan),
            Err(e) => debug!(error = %e, "skipping home plan card"),
        }
    }

    plans
}

fn parse_plan(card: ElementRef<'_>, cfg: &Config) -> Result<HomePlan, ParseError> {
    let fields = parse_card(card, cfg);
    let name = fields.name.ok_or(ParseError::Incomplete {
        kind: "home plan",
        field: "name",
    })?;
    let url = fields.url.ok_or(ParseError::Incomplete {
        kind: "home plan",
        field: "url",
    })?;

    Ok(HomePlan {
        name,
        url,
        details: PlanDetails {
            price: fields.price,
            beds: fields.beds,
            baths: fields.baths,
            sqft: fields.sqft,
            status: PLAN_STATUS.to_string(),
            image_url: plan_image(card),
        },
        included_features: included_features(card),
        floorplan_images: Vec::new(),
    })
}

/// `data-desktop-image`, else the inline `background-image: url('…')`.
fn plan_image(card: ElementRef<'_>) -> Option<String> {
    let link = card.select(&IMAGE_LINK).next()?;
    if let Some(src) = link.value().attr("data-desktop-image") {
        return Some(src.to_string());
    }
    let style = link.value().attr("style")?;
    STYLE_URL_RE.captures(style).map(|c| c[1].to_string())
}

/// Positions count every list item, including empty ones that are skipped.
fn included_features(card: ElementRef<'_>) -> Vec<IncludedFeature> {
    card.select(&CONTENT_ITEM)
        .enumerate()
        .filter_map(|(idx, item)| {
            element_text(item).map(|description| IncludedFeature {
                section_index: idx.to_string(),
                description,
            })
        })
        .collect()
}
