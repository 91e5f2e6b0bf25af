use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::address::{parse_homesite_address, HomesiteAddress};
use super::cards::{cards_in_panel, parse_card};
use crate::config::Config;
use crate::parser::dom::element_text;
use crate::parser::ParseError;

pub const PANEL_ID: &str = "panel-quick-move-ins";

static OVERVIEW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.property-card__content p").unwrap());

/// A move-in-ready card before its detail page and coordinates are fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct HomesiteCard {
    /// 1-based position among all cards in the panel.
    pub id: usize,
    pub plan: Option<String>,
    pub url: String,
    pub address: HomesiteAddress,
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub sqft: Option<String>,
    pub overview: Option<String>,
}

pub fn extract(doc: &Html, cfg: &Config) -> Vec<HomesiteCard> {
    let mut homes = Vec::new();

    for (idx, card) in cards_in_panel(doc, PANEL_ID).into_iter().enumerate() {
        match parse_homesite(card, idx + 1, cfg) {
            Ok(home) => homes.push(home),
            Err(e) => debug!(id = idx + 1, error = %e, "skipping homesite card"),
        }
    }

    homes
}

fn parse_homesite(card: ElementRef<'_>, id: usize, cfg: &Config) -> Result<HomesiteCard, ParseError> {
    let fields = parse_card(card, cfg);
    let url = fields.url.ok_or(ParseError::Incomplete {
        kind: "homesite",
        field: "url",
    })?;
    // The display name is derived from the address, so no address means no name.
    let address = parse_homesite_address(&url, cfg).ok_or(ParseError::Incomplete {
        kind: "homesite",
        field: "name",
    })?;

    Ok(HomesiteCard {
        id,
        plan: fields.name,
        url,
        address,
        price: fields.price,
        beds: fields.beds,
        baths: fields.baths,
        sqft: fields.sqft,
        overview: card.select(&OVERVIEW).next().and_then(element_text),
    })
}
