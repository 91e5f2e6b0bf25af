use std::sync::LazyLock;

use regex::Regex;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[\d,]+K?").unwrap());
#[cfg_attr(not(test), allow(dead_code))]
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").unwrap());

/// Collapse whitespace runs and trim. `None` for empty input, never `Some("")`.
pub fn normalize_whitespace(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// `"From $X"` for one price token, `"$X-$Y"` for the first two of several.
pub fn extract_price_range(text: &str) -> Option<String> {
    let mut prices = PRICE_RE.find_iter(text).map(|m| m.as_str());
    let first = prices.next()?;
    match prices.next() {
        Some(second) => Some(format!("{}-{}", first, second)),
        None => Some(format!("From {}", first)),
    }
}

/// First and last numeric token in scan order, not sorted.
#[cfg_attr(not(test), allow(dead_code))]
pub fn extract_number_range(text: &str) -> Option<String> {
    let numbers: Vec<&str> = NUMBER_RE.find_iter(text).map(|m| m.as_str()).collect();
    match numbers.as_slice() {
        [] => None,
        [only] => Some(only.to_string()),
        [first, .., last] => Some(format!("{} - {}", first, last)),
    }
}

/// `paseo` → `Paseo`, `WAY` → `Way`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}
