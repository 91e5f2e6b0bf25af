use scraper::{ElementRef, Html};

use super::text::normalize_whitespace;

/// All text nodes in document order, skipping script and style bodies.
pub fn text_nodes(doc: &Html) -> impl Iterator<Item = &str> + '_ {
    doc.root_element().descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let in_code = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|p| matches!(p.value().name(), "script" | "style" | "noscript"));
        if in_code {
            None
        } else {
            Some(&**text)
        }
    })
}

/// Concatenated, whitespace-normalized text of an element.
pub fn element_text(el: ElementRef<'_>) -> Option<String> {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Non-empty trimmed text nodes under an element, one per line of markup.
pub fn stripped_strings(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exact class-attribute match (order and count of classes included),
/// as opposed to a selector's "has all of these classes".
pub fn has_exact_classes(el: ElementRef<'_>, classes: &str) -> bool {
    el.value()
        .attr("class")
        .is_some_and(|c| c.split_whitespace().eq(classes.split_whitespace()))
}

/// Next sibling element with the given tag name.
pub fn next_sibling_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| sib.value().name() == name)
}
