use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::parser::dom::element_text;

static CARD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.tabs__series-item.tabs__series-item--third.js-iframe-url").unwrap()
});
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h4.property-card__title a").unwrap());
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.property-card__price").unwrap());
static FEATURE_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.property-card__feature-list li").unwrap());

/// Fields common to plan and homesite cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardFields {
    pub name: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub sqft: Option<String>,
}

/// Series-item cards inside the tab panel with the given id, in document order.
pub fn cards_in_panel<'a>(doc: &'a Html, panel_id: &str) -> Vec<ElementRef<'a>> {
    let panel_sel = match Selector::parse(&format!("li#{}", panel_id)) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    match doc.select(&panel_sel).next() {
        Some(panel) => panel.select(&CARD).collect(),
        None => Vec::new(),
    }
}

pub fn parse_card(card: ElementRef<'_>, cfg: &Config) -> CardFields {
    let mut fields = CardFields::default();

    if let Some(link) = card.select(&TITLE_LINK).next() {
        fields.name = element_text(link);
        fields.url = link.value().attr("href").map(|h| cfg.absolute_url(h));
    }

    fields.price = card
        .select(&PRICE)
        .next()
        .and_then(element_text)
        .and_then(|p| {
            let p = p.replace("From ", "");
            if p.is_empty() {
                None
            } else {
                Some(p)
            }
        });

    for item in card.select(&FEATURE_ITEM) {
        let Some(text) = element_text(item) else {
            continue;
        };
        apply_feature(&mut fields, &text);
    }

    fields
}

/// One feature-list entry. Markers are matched by presence, not position.
fn apply_feature(fields: &mut CardFields, text: &str) {
    let first_token = || text.split_whitespace().next().map(str::to_string);

    if text.contains("Beds") {
        fields.beds = first_token();
    } else if text.contains("Baths") {
        fields.baths = parse_baths(text);
    } else if text.contains("sq. ft.") {
        fields.sqft = first_token().map(|t| t.replace(',', ""));
    }
}

/// `2 Baths | 1 Half Bath` → `2.5`.
fn parse_baths(text: &str) -> Option<String> {
    let mut parts = text.split('|');
    let main = parts.next()?.split_whitespace().next()?;
    match parts.next() {
        Some(half) if half.contains("Half") => Some(format!("{}.5", main)),
        _ => Some(main.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(inner: &str) -> String {
        format!(
            r#"<html><body><ul><li id="panel-home-plans">
                <div class="tabs__series-item tabs__series-item--third js-iframe-url">{}</div>
            </li></ul></body></html>"#,
            inner
        )
    }

    #[test]
    fn full_card() {
        let html = card(
            r#"<h4 class="property-card__title"><a href="/phoenix/estrella/jade">  Jade </a></h4>
               <div class="property-card__price">From $412,990</div>
               <ul class="property-card__feature-list">
                 <li>2,150 sq. ft.</li>
                 <li>4 Beds</li>
                 <li>2 Baths | 1 Half Bath</li>
               </ul>"#,
        );
        let doc = Html::parse_document(&html);
        let cards = cards_in_panel(&doc, "panel-home-plans");
        assert_eq!(cards.len(), 1);
        let f = parse_card(cards[0], &Config::default());
        assert_eq!(f.name.as_deref(), Some("Jade"));
        assert_eq!(
            f.url.as_deref(),
            Some("https://www.ashtonwoods.com/phoenix/estrella/jade")
        );
        assert_eq!(f.price.as_deref(), Some("$412,990"));
        assert_eq!(f.beds.as_deref(), Some("4"));
        assert_eq!(f.baths.as_deref(), Some("2.5"));
        assert_eq!(f.sqft.as_deref(), Some("2150"));
    }

    #[test]
    fn baths_without_half() {
        assert_eq!(parse_baths("3 Baths").as_deref(), Some("3"));
        assert_eq!(parse_baths("3 Baths | 1 Powder").as_deref(), Some("3"));
        assert_eq!(parse_baths("2 Baths | 1 Half Bath").as_deref(), Some("2.5"));
    }

    #[test]
    fn missing_panel_yields_no_cards() {
        let doc = Html::parse_document(&card(""));
        assert!(cards_in_panel(&doc, "panel-quick-move-ins").is_empty());
    }
}
