pub mod assemble;
pub mod dom;
pub mod extract;
pub mod text;

use scraper::Html;
use thiserror::Error;

use crate::config::Config;
use extract::ExtractedPage;

/// Why a single extraction step produced nothing.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("missing element: {0}")]
    Missing(&'static str),

    #[error("no text matching {0}")]
    NoMatch(&'static str),

    #[error("incomplete {kind}: no {field}")]
    Incomplete {
        kind: &'static str,
        field: &'static str,
    },

    #[error("malformed {what}: {detail}")]
    Malformed { what: &'static str, detail: String },
}

/// Rendered markup → owned extraction results. The DOM does not outlive this call.
pub fn process_page(html: &str, cfg: &Config) -> ExtractedPage {
    let doc = Html::parse_document(html);
    extract::extract_all(&doc, cfg)
}
