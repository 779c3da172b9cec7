// HTML selection helpers shared by the news extractors and the quote pages,
// plus the headless Chrome session used for client-rendered pages.

pub mod browser;

pub use browser::{BrowserSession, PageRenderer};

use scraper::{ElementRef, Selector};

use crate::error::CollectorError;

/// Parse a CSS selector, keeping the offending text in the error
pub fn selector(css: &str) -> Result<Selector, CollectorError> {
    Selector::parse(css).map_err(|e| CollectorError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// First non-blank text node that is a direct child of `el`.
///
/// Returned untrimmed so callers decide how to normalize.
pub fn own_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .filter_map(|child| child.value().as_text())
        .find(|text| !text.trim().is_empty())
        .map(|text| text.to_string())
}

/// Direct text of the first element under `scope` matching `sel` that has any
pub fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope.select(sel).find_map(own_text)
}

/// Every non-blank direct text node of every element under `scope` matching `sel`
pub fn all_text(scope: ElementRef<'_>, sel: &Selector) -> Vec<String> {
    scope
        .select(sel)
        .flat_map(|el| {
            el.children()
                .filter_map(|child| child.value().as_text())
                .filter(|text| !text.trim().is_empty())
                .map(|text| text.to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Attribute of the first element under `scope` matching `sel` that carries it
pub fn first_attr(scope: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    scope
        .select(sel)
        .find_map(|el| el.value().attr(attr))
        .map(|value| value.to_string())
}

/// All descendant text of `el`, trimmed
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
