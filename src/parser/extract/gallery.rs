use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

pub const MAX_IMAGES: usize = 12;

/// Detail-page readiness markers, tried in this order.
pub const READY_MARKERS: [&str; 3] = [
    ".gallery-modal__item",
    ".image-content__slider-container",
    ".col-12",
];

const BLOCKED: &[&str] = &["bizible.com", "marvel-b1-cdn"];
const ALLOWED_HOSTS: &[&str] = &["ashtonwoods.com", "widen.net"];

static GALLERY_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.gallery-modal__item").unwrap());
static ANY_IMAGE_HOST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div, img").unwrap());
static BACKGROUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?(.*?)["']?\)"#).unwrap());

/// Up to [`MAX_IMAGES`] distinct site images from a homesite detail page.
/// Gallery items first; a page-wide scan only when the gallery is empty.
pub fn extract_images(doc: &Html) -> Vec<String> {
    let mut images = ImageSet::default();

    for item in doc.select(&GALLERY_ITEM) {
        images.push(item.value().attr("data-desktop-image"));
    }

    if images.is_empty() {
        for el in doc.select(&ANY_IMAGE_HOST) {
            let attrs = el.value();
            images.push(attrs.attr("data-desktop-image"));
            images.push(attrs.attr("src"));
            if let Some(style) = attrs.attr("style").filter(|s| s.contains("background-image")) {
                images.push(BACKGROUND_RE.captures(style).and_then(|c| c.get(1)).map(|m| m.as_str()));
            }
        }
    }

    images.into_vec()
}

pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() || BLOCKED.iter().any(|b| url.contains(b)) {
        return false;
    }
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed.host_str().is_some_and(|host| {
        ALLOWED_HOSTS
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{}", allowed)))
    })
}

/// Insertion-ordered, de-duplicated, capped.
#[derive(Default)]
struct ImageSet {
    urls: Vec<String>,
}

impl ImageSet {
    fn push(&mut self, candidate: Option<&str>) {
        let Some(url) = candidate else { return };
        if self.urls.len() >= MAX_IMAGES || !is_valid_image_url(url) {
            return;
        }
        if !self.urls.iter().any(|u| u == url) {
            self.urls.push(url.to_string());
        }
    }

    fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn into_vec(self) -> Vec<String> {
        self.urls
    }
}
