use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::config::Config;
use crate::model::AddressInfo;
use crate::parser::dom::{element_text, next_sibling_named, stripped_strings};
use crate::parser::text::capitalize;
use crate::parser::ParseError;

static CONTENT_P: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.image-content__main p").unwrap());

const SALES_OFFICE_LABEL: &str = "Sales Office";

/// Sales office address, or an all-empty one (market still set) on any shape mismatch.
pub fn parse_community_address(doc: &Html, market: &str) -> AddressInfo {
    match try_parse_community_address(doc) {
        Ok((full_address, city, state)) => AddressInfo {
            full_address,
            city,
            state,
            market: market.to_string(),
        },
        Err(e) => {
            tracing::debug!(error = %e, "no sales office address");
            AddressInfo {
                market: market.to_string(),
                ..Default::default()
            }
        }
    }
}

fn try_parse_community_address(doc: &Html) -> Result<(String, String, String), ParseError> {
    let label = doc
        .select(&CONTENT_P)
        .find(|p| element_text(*p).as_deref() == Some(SALES_OFFICE_LABEL))
        .ok_or(ParseError::Missing("sales office label"))?;
    let block = next_sibling_named(label, "p").ok_or(ParseError::Missing("sales office block"))?;

    let lines = stripped_strings(block);
    let (street, city_line) = match lines.as_slice() {
        [street, city_line, ..] => (street, city_line),
        _ => {
            return Err(ParseError::Malformed {
                what: "sales office block",
                detail: format!("{} line(s)", lines.len()),
            })
        }
    };

    let (city, state_zip) = match city_line.split(',').collect::<Vec<_>>().as_slice() {
        [city, state_zip] => (city.trim().to_string(), state_zip.trim().to_string()),
        _ => {
            return Err(ParseError::Malformed {
                what: "city line",
                detail: city_line.clone(),
            })
        }
    };

    let (state, zip) = match state_zip.split_whitespace().collect::<Vec<_>>().as_slice() {
        [state, zip] => (state.to_string(), zip.to_string()),
        _ => {
            return Err(ParseError::Malformed {
                what: "state/zip",
                detail: state_zip.clone(),
            })
        }
    };

    let full = format!("{}, {}, {} {}", street, city, state, zip);
    Ok((full, city, state))
}

/// Street address rebuilt from a homesite URL slug.
#[derive(Debug, Clone, PartialEq)]
pub struct HomesiteAddress {
    pub street_number: String,
    pub direction: String,
    pub street_name: String,
    /// `{num} {dir} {street}, {city}, {state} {zip}`
    pub address: String,
    /// Same as `address` minus the ZIP.
    pub display_name: String,
}

/// `lot-584-5510-w-paseo-way-jade` → `5510 W Paseo Way, …`. The last token is the plan name.
pub fn parse_homesite_address(home_url: &str, cfg: &Config) -> Option<HomesiteAddress> {
    let segment = home_url
        .split(['?', '#'])
        .next()
        .unwrap_or(home_url)
        .trim_end_matches('/')
        .rsplit('/')
        .next()?;
    let tokens: Vec<&str> = segment.split('-').collect();
    if tokens.len() < 4 {
        return None;
    }

    let street_number = tokens[2].to_string();
    let direction = tokens[3].to_uppercase();
    let street_name = if tokens.len() > 5 {
        tokens[4..tokens.len() - 1]
            .iter()
            .map(|t| capitalize(t))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        String::new()
    };

    let display_name = format!(
        "{} {} {}, {}, {}",
        street_number, direction, street_name, cfg.homesite_city, cfg.homesite_state
    );
    let address = format!("{} {}", display_name, cfg.homesite_zip);

    Some(HomesiteAddress {
        street_number,
        direction,
        street_name,
        address,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office(block: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="image-content__main">
                <p>Sales Office</p>{}
            </div></body></html>"#,
            block
        ))
    }

    #[test]
    fn sales_office_address() {
        let doc = office("<p>123 Main St<br>Laveen, AZ 85339</p>");
        let a = parse_community_address(&doc, "Phoenix");
        assert_eq!(a.full_address, "123 Main St, Laveen, AZ 85339");
        assert_eq!(a.city, "Laveen");
        assert_eq!(a.state, "AZ");
        assert_eq!(a.market, "Phoenix");
    }

    #[test]
    fn skips_non_paragraph_siblings() {
        let doc = office("<span>Open daily</span><p>123 Main St<br>Laveen, AZ 85339</p>");
        let a = parse_community_address(&doc, "Phoenix");
        assert_eq!(a.city, "Laveen");
    }

    #[test]
    fn malformed_city_line_is_all_empty() {
        let doc = office("<p>123 Main St<br>Laveen AZ 85339</p>");
        let a = parse_community_address(&doc, "Phoenix");
        assert_eq!(
            a,
            AddressInfo {
                market: "Phoenix".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn single_line_or_bad_zip_is_all_empty() {
        let one_line = parse_community_address(&office("<p>123 Main St</p>"), "Phoenix");
        assert_eq!(one_line.full_address, "");
        let no_zip = parse_community_address(&office("<p>123 Main St<br>Laveen, AZ</p>"), "Phoenix");
        assert_eq!(no_zip.full_address, "");
        assert_eq!(no_zip.city, "");
    }

    #[test]
    fn missing_label_is_all_empty() {
        let doc = Html::parse_document("<html><body><h1>Estrella</h1></body></html>");
        let a = parse_community_address(&doc, "Phoenix");
        assert_eq!(a.full_address, "");
        assert_eq!(a.market, "Phoenix");
    }

    #[test]
    fn homesite_slug() {
        let cfg = Config::default();
        let a = parse_homesite_address(
            "https://www.ashtonwoods.com/phoenix/estrella-crossing/lot-584-5510-w-paseo-way-jade",
            &cfg,
        )
        .unwrap();
        assert_eq!(a.street_number, "5510");
        assert_eq!(a.direction, "W");
        assert_eq!(a.street_name, "Paseo Way");
        assert_eq!(a.address, "5510 W Paseo Way, Laveen, AZ 85339");
        assert_eq!(a.display_name, "5510 W Paseo Way, Laveen, AZ");
    }

    #[test]
    fn homesite_slug_too_short() {
        let cfg = Config::default();
        assert_eq!(parse_homesite_address("https://x.test/homes/lot-12-jade", &cfg), None);
    }
}
